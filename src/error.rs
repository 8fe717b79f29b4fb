use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvobiasError {
    #[error("Gene index {index} out of bounds (genome has {len} genes)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Invalid regime: {0}")]
    InvalidRegime(String),

    #[error("Gene count mismatch: expected {expected}, got {actual}")]
    GeneCount { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Evolution time budget exceeded: {elapsed_ms}ms elapsed, budget {budget_ms}ms")]
    TimeBudgetExceeded { budget_ms: u64, elapsed_ms: u64 },

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EvobiasError {
    /// Failures a periodic caller may treat as "skip this cycle".
    ///
    /// Configuration problems (gene count, regime, parameter names) are never
    /// skippable and must abort the caller.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            EvobiasError::Simulation(_) | EvobiasError::TimeBudgetExceeded { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EvobiasError>;
