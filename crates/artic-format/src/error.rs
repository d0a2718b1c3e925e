//! Error types for artic-format.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid skeleton: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Solver construction failed: {0}")]
    Solver(#[from] artic_rigid::RneaError),
}

pub type Result<T> = std::result::Result<T, FormatError>;
