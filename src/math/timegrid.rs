use crate::kernelexperienceerror::KernelExperienceError;

/// Uniform grid t_k = k·dt, k = 0..n-1, with t_0 = 0 and t_{n-1} = t_max.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    dt: f64,
    times: Vec<f64>,
}

impl TimeGrid {
    pub fn new(t_max: f64, n_points: usize) -> Result<TimeGrid, KernelExperienceError> {
        if n_points < 2 {
            return Err(KernelExperienceError::invalid_argument(format!(
                "n_points must be >= 2, got {}",
                n_points
            )));
        }
        if !(t_max.is_finite() && t_max > 0.0) {
            return Err(KernelExperienceError::invalid_argument(format!(
                "t_max must be finite and > 0, got {}",
                t_max
            )));
        }

        let dt = t_max / (n_points - 1) as f64;
        let mut times: Vec<f64> = (0..n_points).map(|k| k as f64 * dt).collect();
        // k·dt 在最後一點可能有捨入誤差，直接釘在 t_max
        times[n_points - 1] = t_max;

        Ok(TimeGrid { dt, times })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn t_max(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The n unique lags {0, dt, 2dt, …, (n-1)dt}.
    ///
    /// Computed as k·dt rather than t_i - t_j so that every pair (i, j) with
    /// the same index distance maps onto the same lag value.
    pub fn lags(&self) -> Vec<f64> {
        (0..self.times.len()).map(|k| k as f64 * self.dt).collect()
    }

    pub fn into_times(self) -> Vec<f64> {
        self.times
    }
}
