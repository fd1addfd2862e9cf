// Central Error Type for the Core

use thiserror::Error;

/// Core-level error type
///
/// Execution failures never show up here: they are captured inside the
/// `ExecutionRecord`. Only precondition and configuration problems propagate.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
