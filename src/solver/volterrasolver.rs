use tracing::debug;

use crate::kernel::kernelevaluator::KernelEvaluator;
use crate::kernelexperienceerror::KernelExperienceError;
use crate::math::timegrid::TimeGrid;
use crate::solver::coefficientmatrix::{
    CoefficientMatrix,
    CoefficientStrategy
};
use crate::solver::lagtable::LagTable;
use crate::solver::quadraturemethod::{
    EndpointRule,
    QuadratureMethod,
    StepRule
};
use crate::solver::trajectory::Trajectory;

// ─────────────────────────────────────────────────────────────────────────────
// VolterraSolver
// ─────────────────────────────────────────────────────────────────────────────
//
// 求解第二類 Volterra 積分方程：
//
//   x(t) = x0 - ∫₀ᵗ K(t-τ) x(τ) dτ
//
// 步驟：
//   1. 建立等距 TimeGrid（n 點）
//   2. 對 n 個唯一 lag {0, dt, …, (n-1)dt} 呼叫 kernel 一次（O(n) 次求值）
//   3. 組出 row-major 的係數列 K_ij = K((i-j)·dt)
//   4. 逐步前代：x_i 只依賴 x_0..x_{i-1}
//
// 每一步寫成
//
//   x_i = (x0 - s·known_i) / (1 + s·c_i)
//
// s 為 dt（trapezoidal）或 dt/3（Simpson），known_i 為已知項的加權和，
// c_i 為端點項 K_ii·x_i 的係數（EndpointRule::Explicit 時為 0）。

/// Volterra solver for a fixed quadrature rule and coefficient layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VolterraSolver {
    method: QuadratureMethod,
    endpoint: EndpointRule,
    strategy: CoefficientStrategy,
}

impl VolterraSolver {
    pub fn new(method: QuadratureMethod) -> VolterraSolver {
        VolterraSolver {
            method,
            endpoint: EndpointRule::default(),
            strategy: CoefficientStrategy::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointRule) -> VolterraSolver {
        self.endpoint = endpoint;
        self
    }

    pub fn with_strategy(mut self, strategy: CoefficientStrategy) -> VolterraSolver {
        self.strategy = strategy;
        self
    }

    pub fn method(&self) -> QuadratureMethod {
        self.method
    }

    pub fn endpoint(&self) -> EndpointRule {
        self.endpoint
    }

    pub fn strategy(&self) -> CoefficientStrategy {
        self.strategy
    }

    /// Solves on a grid of `n_points` samples over [0, t_max].
    ///
    /// `kernel` is evaluated exactly once, on the `n_points` unique lags.
    /// No partial trajectory is returned on failure.
    #[tracing::instrument(
        skip(self, kernel),
        fields(kernel = kernel.name(), method = %self.method, endpoint = %self.endpoint)
    )]
    pub fn solve<K>(
        &self,
        kernel: &K,
        t_max: f64,
        n_points: usize,
        x0: f64,
    ) -> Result<Trajectory, KernelExperienceError>
    where
        K: KernelEvaluator + ?Sized,
    {
        if !(x0.is_finite() && x0 != 0.0) {
            return Err(KernelExperienceError::invalid_argument(format!(
                "x0 must be finite and non-zero, got {}",
                x0
            )));
        }
        let grid = TimeGrid::new(t_max, n_points)?;
        let lag_table = LagTable::build(kernel, &grid)?;
        let matrix = CoefficientMatrix::new(&lag_table, self.strategy);
        debug!(n_points, dt = grid.dt(), strategy = ?matrix.strategy(), "coefficient table ready");

        let x = self.integrate(&matrix, grid.dt(), x0)?;
        Ok(Trajectory::new(grid.into_times(), x))
    }

    fn integrate(
        &self,
        matrix: &CoefficientMatrix,
        dt: f64,
        x0: f64,
    ) -> Result<Vec<f64>, KernelExperienceError> {
        let n = matrix.len();
        let mut x = Vec::with_capacity(n);
        x.push(x0);

        for i in 1..n {
            let row = matrix.row(i);
            let rule = self.method.step_rule(i);
            let (known, endpoint_coef) = self.step_terms(rule, row, &x, i);
            let scale = rule.scale(dt);
            let denominator = 1.0 + scale * endpoint_coef;
            let xi = (x0 - scale * known) / denominator;

            if !xi.is_finite() {
                // 只有分母退化時才歸咎於 lag 0（K_ii）
                let lag_index = if denominator == 0.0 || !denominator.is_finite() {
                    Some(0)
                } else {
                    None
                };
                return Err(KernelExperienceError::solver_failure(
                    lag_index,
                    format!("step {} produced non-finite value (denominator {})", i, denominator),
                ));
            }
            x.push(xi);
        }

        Ok(x)
    }

    /// Known weighted sum of step i and the coefficient of x_i.
    ///
    /// `row` is [K_i0, …, K_ii] and `x` holds x_0..x_{i-1}.
    #[inline]
    fn step_terms(&self, rule: StepRule, row: &[f64], x: &[f64], i: usize) -> (f64, f64) {
        match (rule, self.endpoint) {
            (StepRule::Trapezoidal, EndpointRule::Implicit) => {
                let known = 0.5 * row[0] * x[0] + dot(&row[1..i], &x[1..i]);
                (known, 0.5 * row[i])
            }
            (StepRule::Trapezoidal, EndpointRule::Explicit) => {
                let known = if i == 1 {
                    0.5 * row[0] * x[0]
                } else {
                    0.5 * row[0] * x[0]
                        + dot(&row[1..i - 1], &x[1..i - 1])
                        + 0.5 * row[i - 1] * x[i - 1]
                };
                (known, 0.0)
            }
            (StepRule::Simpson, EndpointRule::Implicit) => {
                let known = row[0] * x[0] + simpson_interior(&row[1..i], &x[1..i]);
                (known, row[i])
            }
            (StepRule::Simpson, EndpointRule::Explicit) => {
                let known = row[0] * x[0]
                    + simpson_interior(&row[1..i], &x[1..i])
                    + row[i] * x[i - 1];
                (known, 0.0)
            }
        }
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(&p, &q)| p * q).sum()
}

/// Σ w_j·K_j·x_j over interior j = 1..i-1 with w = 4 (odd j), 2 (even j).
///
/// Slices start at j = 1, so odd j sit at even offsets.
#[inline]
fn simpson_interior(row: &[f64], x: &[f64]) -> f64 {
    let all = dot(row, x);
    let odd: f64 = row
        .iter()
        .zip(x)
        .step_by(2)
        .map(|(&p, &q)| p * q)
        .sum();
    2.0 * all + 2.0 * odd
}

/// Solves x(t) = x0 - ∫₀ᵗ K(t-τ) x(τ) dτ on a uniform grid of `n_points`.
pub fn solve<K>(
    kernel: &K,
    t_max: f64,
    n_points: usize,
    x0: f64,
    method: QuadratureMethod,
) -> Result<Trajectory, KernelExperienceError>
where
    K: KernelEvaluator + ?Sized,
{
    VolterraSolver::new(method).solve(kernel, t_max, n_points, x0)
}
