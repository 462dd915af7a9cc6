use tracing::trace;

use crate::kernel::kernelevaluator::KernelEvaluator;
use crate::kernelexperienceerror::KernelExperienceError;
use crate::math::timegrid::TimeGrid;

/// K(k·dt) for k = 0..n-1, built from a single batched kernel call.
#[derive(Debug, Clone, PartialEq)]
pub struct LagTable {
    values: Vec<f64>,
}

impl LagTable {
    /// Evaluates `kernel` once on all unique lags of `grid`.
    ///
    /// Fails with `KernelContractViolation` on a length mismatch and with
    /// `SolverFailure` when the kernel errors or yields a non-finite value.
    pub fn build<K>(kernel: &K, grid: &TimeGrid) -> Result<LagTable, KernelExperienceError>
    where
        K: KernelEvaluator + ?Sized,
    {
        let lags = grid.lags();
        trace!(kernel = kernel.name(), n_lags = lags.len(), "evaluating kernel batch");
        let values = kernel.evaluate(&lags)?;

        if values.len() != lags.len() {
            return Err(KernelExperienceError::KernelContractViolation {
                expected: lags.len(),
                got: values.len(),
            });
        }

        if let Some(k) = values.iter().position(|v| !v.is_finite()) {
            return Err(KernelExperienceError::solver_failure(
                Some(k),
                format!("kernel returned non-finite value {} at lag {}", values[k], lags[k]),
            ));
        }

        Ok(LagTable { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, k: usize) -> f64 {
        self.values[k]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}
