use std::fmt;

/// Error returned by a `KernelEvaluator` when it cannot produce values.
///
/// `lag_index` is the position inside the requested batch when the
/// evaluator knows which lag failed.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelEvaluationError {
    lag_index: Option<usize>,
    message: String,
}

impl KernelEvaluationError {
    pub fn new(message: impl Into<String>) -> KernelEvaluationError {
        KernelEvaluationError { lag_index: None, message: message.into() }
    }

    pub fn at_lag(lag_index: usize, message: impl Into<String>) -> KernelEvaluationError {
        KernelEvaluationError { lag_index: Some(lag_index), message: message.into() }
    }

    pub fn lag_index(&self) -> Option<usize> {
        self.lag_index
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for KernelEvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lag_index {
            Some(index) => write!(f, "kernel evaluation failed at lag {}: {}", index, self.message),
            None => write!(f, "kernel evaluation failed: {}", self.message),
        }
    }
}

impl std::error::Error for KernelEvaluationError {}

// ─────────────────────────────────────────────────────────────────────────────
// KernelExperienceError
// ─────────────────────────────────────────────────────────────────────────────

/// 全部 fallible 操作共用的錯誤型別。
///
/// - `InvalidArgument`：設定不合法，於任何計算開始前偵測。
/// - `KernelContractViolation`：batched evaluator 回傳長度不符。
/// - `SolverFailure`：kernel 失敗或產生非有限值，附帶出錯的 lag index。
#[derive(Debug, thiserror::Error)]
pub enum KernelExperienceError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("kernel contract violation: requested {expected} lags, received {got} values")]
    KernelContractViolation { expected: usize, got: usize },

    #[error("solver failure{}: {reason}", display_lag(.lag_index))]
    SolverFailure {
        lag_index: Option<usize>,
        reason: String,
    },

    #[error("{0}")]
    IOError(#[from] std::io::Error),

    #[error("{0}")]
    JsonParseError(#[from] serde_json::Error),
}

fn display_lag(lag_index: &Option<usize>) -> String {
    match lag_index {
        Some(index) => format!(" at lag index {}", index),
        None => String::new(),
    }
}

impl KernelExperienceError {
    pub fn invalid_argument(reason: impl Into<String>) -> KernelExperienceError {
        KernelExperienceError::InvalidArgument { reason: reason.into() }
    }

    pub fn solver_failure(lag_index: Option<usize>, reason: impl Into<String>) -> KernelExperienceError {
        KernelExperienceError::SolverFailure { lag_index, reason: reason.into() }
    }
}

impl From<KernelEvaluationError> for KernelExperienceError {
    fn from(error: KernelEvaluationError) -> Self {
        KernelExperienceError::SolverFailure {
            lag_index: error.lag_index(),
            reason: error.message().to_owned(),
        }
    }
}
