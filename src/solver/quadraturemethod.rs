use std::fmt;
use std::str::FromStr;

use crate::kernelexperienceerror::KernelExperienceError;

/// Quadrature rule used by the Volterra recurrence.
///
/// Selected once per solve; strings are only parsed at the boundary
/// through `FromStr`, never inside the integration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuadratureMethod {
    #[default]
    Trapezoidal,
    Simpson,
}

/// Rule actually applied at one step of the recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRule {
    /// Weights ½, 1, …, 1, ½ scaled by dt.
    Trapezoidal,
    /// Weights 1, 4, 2, 4, …, 4, 1 scaled by dt/3.
    Simpson,
}

impl StepRule {
    #[inline]
    pub fn scale(&self, dt: f64) -> f64 {
        match self {
            StepRule::Trapezoidal => dt,
            StepRule::Simpson => dt / 3.0,
        }
    }
}

/// How the j = i term of step i, which involves the unknown x_i, is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointRule {
    /// The endpoint term w·K(0)·x_i is kept and solved for, the equation
    /// being linear in x_i. Second order for kernels finite at the origin.
    #[default]
    Implicit,

    /// Only known values enter the step. Trapezoidal sums over j = 0..i-1
    /// with weight ½ at j = 0 and j = i-1 (a single ½ when i = 1); Simpson
    /// evaluates its endpoint with x_{i-1}. Trapezoidal never reads K(0),
    /// which suits kernels singular at the origin.
    Explicit,
}

impl EndpointRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointRule::Implicit => "implicit",
            EndpointRule::Explicit => "explicit",
        }
    }
}

impl QuadratureMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuadratureMethod::Trapezoidal => "trapezoidal",
            QuadratureMethod::Simpson => "simpson",
        }
    }

    /// 第 i 步（i ≥ 1）使用的規則。
    ///
    /// Simpson 只在 i 為偶數（偶數個子區間）時成立；i 為奇數時該步退回
    /// trapezoidal rule。這是固定的政策，不是 bug。
    #[inline]
    pub fn step_rule(&self, i: usize) -> StepRule {
        match self {
            QuadratureMethod::Simpson if i % 2 == 0 => StepRule::Simpson,
            _ => StepRule::Trapezoidal,
        }
    }
}

impl fmt::Display for QuadratureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for EndpointRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QuadratureMethod {
    type Err = KernelExperienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trapezoidal" => Ok(QuadratureMethod::Trapezoidal),
            "simpson" => Ok(QuadratureMethod::Simpson),
            _ => Err(KernelExperienceError::invalid_argument(format!(
                "method must be 'trapezoidal' or 'simpson', got '{}'",
                s
            ))),
        }
    }
}

impl FromStr for EndpointRule {
    type Err = KernelExperienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "implicit" => Ok(EndpointRule::Implicit),
            "explicit" => Ok(EndpointRule::Explicit),
            _ => Err(KernelExperienceError::invalid_argument(format!(
                "endpoint must be 'implicit' or 'explicit', got '{}'",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("trapezoidal".parse::<QuadratureMethod>().unwrap(), QuadratureMethod::Trapezoidal);
        assert_eq!("simpson".parse::<QuadratureMethod>().unwrap(), QuadratureMethod::Simpson);
        assert_eq!("explicit".parse::<EndpointRule>().unwrap(), EndpointRule::Explicit);
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "midpoint".parse::<QuadratureMethod>().unwrap_err();
        assert!(matches!(err, KernelExperienceError::InvalidArgument { .. }));
        assert!(err.to_string().contains("midpoint"));
        assert!("lagged".parse::<EndpointRule>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for method in [QuadratureMethod::Trapezoidal, QuadratureMethod::Simpson] {
            assert_eq!(method.to_string().parse::<QuadratureMethod>().unwrap(), method);
        }
        for endpoint in [EndpointRule::Implicit, EndpointRule::Explicit] {
            assert_eq!(endpoint.to_string().parse::<EndpointRule>().unwrap(), endpoint);
        }
    }

    #[test]
    fn trapezoidal_is_used_at_every_step() {
        for i in 1..6 {
            assert_eq!(QuadratureMethod::Trapezoidal.step_rule(i), StepRule::Trapezoidal);
        }
    }

    #[test]
    fn simpson_alternates_with_trapezoidal_fallback() {
        let rules: Vec<StepRule> = (1..6).map(|i| QuadratureMethod::Simpson.step_rule(i)).collect();
        assert_eq!(
            rules,
            vec![
                StepRule::Trapezoidal,
                StepRule::Simpson,
                StepRule::Trapezoidal,
                StepRule::Simpson,
                StepRule::Trapezoidal,
            ]
        );
    }

    #[test]
    fn rule_scales() {
        assert_eq!(StepRule::Trapezoidal.scale(0.3), 0.3);
        assert!((StepRule::Simpson.scale(0.3) - 0.1).abs() < 1e-15);
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert!("Simpson".parse::<QuadratureMethod>().is_err());
        assert!("IMPLICIT".parse::<EndpointRule>().is_err());
    }
}
