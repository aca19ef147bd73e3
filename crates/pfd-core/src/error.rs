use std::io;

use pfd_domain::DateRangeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("Invalid year: {0}")]
    InvalidYear(i32),
    #[error("Invalid date range: {0}")]
    InvalidRange(#[from] DateRangeError),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
