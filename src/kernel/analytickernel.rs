use statrs::function::gamma::gamma as gamma_function;

use crate::kernel::kernelevaluator::KernelEvaluator;
use crate::kernelexperienceerror::{
    KernelEvaluationError,
    KernelExperienceError
};

// ─────────────────────────────────────────────────────────────────────────────
// Analytic kernels
// ─────────────────────────────────────────────────────────────────────────────
//
// 常用解析 kernel，全部實作 KernelEvaluator（batched）。
// 負 lag 一律視為 0；power-law 類在 t = 0 奇異，以 SINGULAR_LAG_FLOOR 取代。
// Γ(α) 由 statrs 提供，本 crate 不實作特殊函數。

/// Lag substituted for zero in kernels that diverge at the origin.
pub const SINGULAR_LAG_FLOOR: f64 = 1e-12;

fn positive(name: &str, value: f64) -> Result<f64, KernelExperienceError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(KernelExperienceError::invalid_argument(format!(
            "{} must be finite and > 0, got {}",
            name, value
        )))
    }
}

/// K(t) = γ. The Volterra equation then has the closed form x0·e^{-γt}.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantKernel {
    gamma: f64,
}

impl ConstantKernel {
    pub fn new(gamma: f64) -> Result<ConstantKernel, KernelExperienceError> {
        if !gamma.is_finite() {
            return Err(KernelExperienceError::invalid_argument(format!(
                "gamma must be finite, got {}",
                gamma
            )));
        }
        Ok(ConstantKernel { gamma })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl KernelEvaluator for ConstantKernel {
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        Ok(vec![self.gamma; lags.len()])
    }

    fn name(&self) -> &str {
        "Constant"
    }
}

/// K(t) = γ·e^{-γt}
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialKernel {
    gamma: f64,
}

impl ExponentialKernel {
    pub fn new(gamma: f64) -> Result<ExponentialKernel, KernelExperienceError> {
        Ok(ExponentialKernel { gamma: positive("gamma", gamma)? })
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl KernelEvaluator for ExponentialKernel {
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        Ok(lags
            .iter()
            .map(|&t| self.gamma * (-self.gamma * t.max(0.0)).exp())
            .collect())
    }

    fn name(&self) -> &str {
        "Exponential"
    }
}

/// K(t) = γ·t^{α-1}·e^{-βt} / Γ(α)
///
/// With β = 0 this is the plain power law, see [`PowerLawKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperedPowerLawKernel {
    alpha: f64,
    beta: f64,
    gamma: f64,
    prefactor: f64,
}

impl TemperedPowerLawKernel {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<TemperedPowerLawKernel, KernelExperienceError> {
        let alpha = positive("alpha", alpha)?;
        if !(beta.is_finite() && beta >= 0.0) {
            return Err(KernelExperienceError::invalid_argument(format!(
                "beta must be finite and >= 0, got {}",
                beta
            )));
        }
        let gamma = positive("gamma", gamma)?;
        let prefactor = gamma / gamma_function(alpha);
        Ok(TemperedPowerLawKernel { alpha, beta, gamma, prefactor })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    #[inline]
    fn value(&self, t: f64) -> f64 {
        let t_safe = if t > 0.0 { t } else { SINGULAR_LAG_FLOOR };
        self.prefactor * t_safe.powf(self.alpha - 1.0) * (-self.beta * t_safe).exp()
    }
}

impl KernelEvaluator for TemperedPowerLawKernel {
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        Ok(lags.iter().map(|&t| self.value(t)).collect())
    }

    fn name(&self) -> &str {
        "TemperedPowerLaw"
    }
}

/// K(t) = γ·t^{α-1} / Γ(α)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawKernel {
    inner: TemperedPowerLawKernel,
}

impl PowerLawKernel {
    pub fn new(alpha: f64, gamma: f64) -> Result<PowerLawKernel, KernelExperienceError> {
        Ok(PowerLawKernel { inner: TemperedPowerLawKernel::new(alpha, 0.0, gamma)? })
    }

    pub fn alpha(&self) -> f64 {
        self.inner.alpha()
    }

    pub fn gamma(&self) -> f64 {
        self.inner.gamma()
    }
}

impl KernelEvaluator for PowerLawKernel {
    fn evaluate(&self, lags: &[f64]) -> Result<Vec<f64>, KernelEvaluationError> {
        self.inner.evaluate(lags)
    }

    fn name(&self) -> &str {
        "PowerLaw"
    }
}
