use crate::kernelexperienceerror::KernelEvaluationError;

// ─────────────────────────────────────────────────────────────────────────────
// KernelEvaluator
// ─────────────────────────────────────────────────────────────────────────────

/// Batched memory kernel K: R^m → R^m.
///
/// The solver calls `evaluate` exactly once per solve, on the vector of
/// unique lags, and never per (i, j) pair. Implementations must return one
/// value per lag, in the same order, and must be pure functions of `lags`.
///
/// `Send + Sync` 為 supertrait，使 `Arc<dyn KernelEvaluator>` 可跨執行緒共用。
pub trait KernelEvaluator: Send + Sync {
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError>;

    fn name(&self) -> &str {
        "CustomKernel"
    }
}

impl<K: KernelEvaluator + ?Sized> KernelEvaluator for &K {
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        (**self).evaluate(lags)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<K: KernelEvaluator + ?Sized> KernelEvaluator for Box<K> {
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        (**self).evaluate(lags)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<K: KernelEvaluator + ?Sized> KernelEvaluator for std::sync::Arc<K> {
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        (**self).evaluate(lags)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Adapters
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps a scalar `Fn(f64) -> f64` so that it is mapped over the whole batch
/// behind a single `evaluate` call.
pub struct ScalarKernel<F> {
    func: F,
    name: String,
}

impl<F> ScalarKernel<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(func: F) -> ScalarKernel<F> {
        ScalarKernel { func, name: "CustomKernel".to_owned() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> ScalarKernel<F> {
        self.name = name.into();
        self
    }
}

impl<F> KernelEvaluator for ScalarKernel<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        Ok(lags.iter().map(|&tau| (self.func)(tau)).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wraps a fallible batch closure, e.g. a call into an external runtime.
pub struct BatchKernel<F> {
    func: F,
    name: String,
}

impl<F> BatchKernel<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, KernelEvaluationError> + Send + Sync,
{
    pub fn new(func: F) -> BatchKernel<F> {
        BatchKernel { func, name: "CustomKernel".to_owned() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> BatchKernel<F> {
        self.name = name.into();
        self
    }
}

impl<F> KernelEvaluator for BatchKernel<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, KernelEvaluationError> + Send + Sync,
{
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        (self.func)(lags)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn scalar_kernel_maps_each_lag() {
        let kernel = ScalarKernel::new(|t| 2.0 * t).with_name("Doubling");
        assert_eq!(kernel.evaluate(&[0.0, 0.5, 1.0]).unwrap(), vec![0.0, 1.0, 2.0]);
        assert_eq!(kernel.name(), "Doubling");
    }

    #[test]
    fn batch_kernel_forwards_errors() {
        let kernel = BatchKernel::new(|_lags: &[f64]| Err(KernelEvaluationError::at_lag(2, "boom")));
        let err = kernel.evaluate(&[0.0, 1.0, 2.0]).unwrap_err();
        assert_eq!(err.lag_index(), Some(2));
        assert_eq!(kernel.name(), "CustomKernel");
    }

    #[test]
    fn shared_pointers_are_evaluators() {
        let kernel: Arc<dyn KernelEvaluator> = Arc::new(ScalarKernel::new(|t| t + 1.0));
        assert_eq!(kernel.evaluate(&[1.0]).unwrap(), vec![2.0]);
        let boxed: Box<dyn KernelEvaluator> = Box::new(ScalarKernel::new(|_| 3.0));
        assert_eq!(boxed.evaluate(&[9.0]).unwrap(), vec![3.0]);
    }
}
