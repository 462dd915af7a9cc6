use num_complex::Complex64;
use tracing::debug;

use crate::experience::experiencecurve::ExperienceCurve;
use crate::kernelexperienceerror::KernelExperienceError;

/// Floor applied to x/x0 before the real logarithm.
pub const RATIO_FLOOR: f64 = 1e-12;

/// Maps a trajectory x(t) onto n(t) with x(t) = x0·λ^{n(t)}.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperienceProjector {
    x0: f64,
    lambda_param: f64,
    log_lambda: f64,
}

impl ExperienceProjector {
    pub fn new(x0: f64, lambda_param: f64) -> Result<ExperienceProjector, KernelExperienceError> {
        if !(x0.is_finite() && x0 != 0.0) {
            return Err(KernelExperienceError::invalid_argument(format!(
                "x0 must be finite and non-zero, got {}",
                x0
            )));
        }
        if !(lambda_param.is_finite() && lambda_param > 0.0 && lambda_param != 1.0) {
            return Err(KernelExperienceError::invalid_argument(format!(
                "lambda_param must be finite, > 0 and != 1, got {}",
                lambda_param
            )));
        }
        Ok(ExperienceProjector { x0, lambda_param, log_lambda: lambda_param.ln() })
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn lambda_param(&self) -> f64 {
        self.lambda_param
    }

    /// n_i = ln(max(x_i/x0, 1e-12)) / ln λ
    ///
    /// 比值 ≤ 0 來自接近完全衰減時的數值雜訊，直接 clamp，不視為錯誤。
    pub fn project_real(&self, x: &[f64]) -> Vec<f64> {
        let mut clamped = 0usize;
        let n = x
            .iter()
            .map(|&xi| {
                let ratio = xi / self.x0;
                let ratio = if ratio < RATIO_FLOOR {
                    clamped += 1;
                    RATIO_FLOOR
                } else {
                    ratio
                };
                ratio.ln() / self.log_lambda
            })
            .collect();
        if clamped > 0 {
            debug!(clamped, n_samples = x.len(), "ratio clamped before logarithm");
        }
        n
    }

    /// Principal complex logarithm of x_i/x0 divided by ln λ.
    ///
    /// The imaginary part is 0 for positive ratios and π/ln λ for negative
    /// ones, so sign changes of x(t) stay representable.
    pub fn project_complex(&self, x: &[f64]) -> Vec<Complex64> {
        x.iter()
            .map(|&xi| Complex64::new(xi / self.x0, 0.0).ln() / self.log_lambda)
            .collect()
    }

    pub fn project(&self, x: &[f64], return_complex: bool) -> ExperienceCurve {
        if return_complex {
            ExperienceCurve::Complex(self.project_complex(x))
        } else {
            ExperienceCurve::Real(self.project_real(x))
        }
    }
}

/// Projects `x` onto an experience curve, real or complex per `return_complex`.
pub fn project(
    x: &[f64],
    x0: f64,
    lambda_param: f64,
    return_complex: bool,
) -> Result<ExperienceCurve, KernelExperienceError> {
    Ok(ExperienceProjector::new(x0, lambda_param)?.project(x, return_complex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn real_projection_of_powers_of_lambda() {
        let x = [1.0, 0.8, 0.64, 0.512];
        let n = project(&x, 1.0, 0.8, false).unwrap();
        let n = n.as_real().unwrap();
        for (k, &nk) in n.iter().enumerate() {
            assert_relative_eq!(nk, k as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn real_projection_clamps_non_positive_ratios() {
        let n = project(&[0.0, -0.3, 1e-20], 1.0, 0.5, false).unwrap();
        let ceiling = RATIO_FLOOR.ln() / 0.5f64.ln();
        for &v in n.as_real().unwrap() {
            assert_relative_eq!(v, ceiling, epsilon = 1e-12);
        }
    }

    #[test]
    fn complex_projection_of_negative_ratio() {
        let n = project(&[-0.5], 1.0, 0.8, true).unwrap();
        let c = n.as_complex().unwrap()[0];
        assert_relative_eq!(c.re, 0.5f64.ln() / 0.8f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(c.im, PI / 0.8f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn complex_projection_of_positive_ratio_is_real() {
        let x = [2.0, 1.5, 0.3, 1e-6];
        let complex = project(&x, 2.0, 0.7, true).unwrap();
        let real = project(&x, 2.0, 0.7, false).unwrap();
        for (c, r) in complex.as_complex().unwrap().iter().zip(real.as_real().unwrap()) {
            assert_eq!(c.im, 0.0);
            assert_relative_eq!(c.re, *r, epsilon = 1e-12);
        }
    }

    #[test]
    fn negative_initial_value_is_supported() {
        // x/x0 stays positive when both are negative
        let n = project(&[-2.0, -1.0], -2.0, 0.5, false).unwrap();
        assert_relative_eq!(n.as_real().unwrap()[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn output_length_matches_input() {
        let x = vec![1.0; 37];
        assert_eq!(project(&x, 1.0, 0.8, false).unwrap().len(), 37);
        assert_eq!(project(&x, 1.0, 0.8, true).unwrap().len(), 37);
        assert!(project(&[], 1.0, 0.8, true).unwrap().is_empty());
    }

    #[test]
    fn rejects_degenerate_parameters() {
        for (x0, lambda) in [(0.0, 0.8), (1.0, 1.0), (1.0, 0.0), (1.0, -0.5), (f64::NAN, 0.8), (1.0, f64::INFINITY)] {
            assert!(
                matches!(project(&[1.0], x0, lambda, false), Err(KernelExperienceError::InvalidArgument { .. })),
                "x0 = {x0}, lambda = {lambda} should be rejected"
            );
        }
    }
}
