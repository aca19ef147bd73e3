use pfd_config::ConfigError;
use pfd_core::CoreError;
use pfd_domain::DateRangeError;
use thiserror::Error;

/// Error type surfaced by the facade and the reporting CLI.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    DateRange(#[from] DateRangeError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type FinanceResult<T> = Result<T, FinanceError>;
