use std::fs::File;
use std::io::BufReader;
use std::str::FromStr;

use serde::Deserialize;

use crate::kernelexperienceerror::KernelExperienceError;
use crate::solver::coefficientmatrix::CoefficientStrategy;
use crate::solver::quadraturemethod::{
    EndpointRule,
    QuadratureMethod
};
use crate::solver::volterrasolver::VolterraSolver;

fn default_t_max() -> f64 {
    10.0
}

fn default_n_points() -> usize {
    1000
}

fn default_x0() -> f64 {
    1.0
}

fn default_lambda_param() -> f64 {
    0.8
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON 讀入
// ─────────────────────────────────────────────────────────────────────────────
//
// JSON 先讀入 *JsonProp，tag 欄位保留為字串，再經 FromStr 轉成 enum。
// 未知 tag 因此回報 InvalidArgument，JsonParseError 只留給 JSON 本身
// 的語法與型別錯誤。

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SolverConfigurationJsonProp {
    #[serde(default = "default_t_max")]
    t_max: f64,
    #[serde(default = "default_n_points")]
    n_points: usize,
    #[serde(default = "default_x0")]
    x0: f64,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    coefficient_strategy: Option<String>,
}

impl Default for SolverConfigurationJsonProp {
    fn default() -> Self {
        SolverConfigurationJsonProp {
            t_max: default_t_max(),
            n_points: default_n_points(),
            x0: default_x0(),
            method: None,
            endpoint: None,
            coefficient_strategy: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectionConfigurationJsonProp {
    #[serde(default)]
    solver: SolverConfigurationJsonProp,
    #[serde(default = "default_lambda_param")]
    lambda_param: f64,
    #[serde(default)]
    return_complex: bool,
}

fn parse_tag<T>(tag: Option<String>) -> Result<T, KernelExperienceError>
where
    T: FromStr<Err = KernelExperienceError> + Default,
{
    match tag {
        Some(text) => text.parse(),
        None => Ok(T::default()),
    }
}

/// Grid and quadrature parameters of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfiguration {
    pub t_max: f64,
    pub n_points: usize,
    pub x0: f64,
    pub method: QuadratureMethod,
    pub endpoint: EndpointRule,
    pub coefficient_strategy: CoefficientStrategy,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        SolverConfiguration {
            t_max: default_t_max(),
            n_points: default_n_points(),
            x0: default_x0(),
            method: QuadratureMethod::default(),
            endpoint: EndpointRule::default(),
            coefficient_strategy: CoefficientStrategy::default(),
        }
    }
}

impl SolverConfiguration {
    fn from_json_prop(prop: SolverConfigurationJsonProp) -> Result<SolverConfiguration, KernelExperienceError> {
        Ok(SolverConfiguration {
            t_max: prop.t_max,
            n_points: prop.n_points,
            x0: prop.x0,
            method: parse_tag(prop.method)?,
            endpoint: parse_tag(prop.endpoint)?,
            coefficient_strategy: parse_tag(prop.coefficient_strategy)?,
        })
    }

    pub fn validate(&self) -> Result<(), KernelExperienceError> {
        if self.n_points < 2 {
            return Err(KernelExperienceError::invalid_argument(format!(
                "n_points must be >= 2, got {}",
                self.n_points
            )));
        }
        if !(self.t_max.is_finite() && self.t_max > 0.0) {
            return Err(KernelExperienceError::invalid_argument(format!(
                "t_max must be finite and > 0, got {}",
                self.t_max
            )));
        }
        if !(self.x0.is_finite() && self.x0 != 0.0) {
            return Err(KernelExperienceError::invalid_argument(format!(
                "x0 must be finite and non-zero, got {}",
                self.x0
            )));
        }
        Ok(())
    }

    pub fn solver(&self) -> VolterraSolver {
        VolterraSolver::new(self.method)
            .with_endpoint(self.endpoint)
            .with_strategy(self.coefficient_strategy)
    }
}

/// Full parameter set of the K(t) → n(t) pipelines.
///
/// JSON 範例（所有欄位皆可省略，省略時使用預設值）：
///
/// ```json
/// {
///     "solver": { "t_max": 10.0, "n_points": 1000, "x0": 1.0, "method": "simpson", "endpoint": "implicit" },
///     "lambda_param": 0.8,
///     "return_complex": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfiguration {
    pub solver: SolverConfiguration,
    pub lambda_param: f64,
    pub return_complex: bool,
}

impl Default for ProjectionConfiguration {
    fn default() -> Self {
        ProjectionConfiguration {
            solver: SolverConfiguration::default(),
            lambda_param: default_lambda_param(),
            return_complex: false,
        }
    }
}

impl ProjectionConfiguration {
    pub fn validate(&self) -> Result<(), KernelExperienceError> {
        self.solver.validate()?;
        if !(self.lambda_param.is_finite() && self.lambda_param > 0.0 && self.lambda_param != 1.0) {
            return Err(KernelExperienceError::invalid_argument(format!(
                "lambda_param must be finite, > 0 and != 1, got {}",
                self.lambda_param
            )));
        }
        Ok(())
    }

    fn from_json_prop(prop: ProjectionConfigurationJsonProp) -> Result<ProjectionConfiguration, KernelExperienceError> {
        let config = ProjectionConfiguration {
            solver: SolverConfiguration::from_json_prop(prop.solver)?,
            lambda_param: prop.lambda_param,
            return_complex: prop.return_complex,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<ProjectionConfiguration, KernelExperienceError> {
        let prop: ProjectionConfigurationJsonProp = serde_json::from_str(json)?;
        ProjectionConfiguration::from_json_prop(prop)
    }

    pub fn from_reader(file_path: &str) -> Result<ProjectionConfiguration, KernelExperienceError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let prop: ProjectionConfigurationJsonProp = serde_json::from_reader(reader)?;
        ProjectionConfiguration::from_json_prop(prop)
    }
}
