//! Error types used across the Safeline runtime.

use thiserror::Error;

/// Result type for Safeline operations.
pub type SafelineResult<T> = Result<T, SafelineError>;

#[derive(Debug, Error)]
pub enum SafelineError {
    /// Caller-supplied field rejected before touching storage.
    #[error("validation error: {0}")]
    Validation(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Outbound SMS dispatch failed.
    #[error("dispatch error: {0}")]
    Dispatch(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Record not found in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Controller is in the wrong phase for the requested operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("internal error: {0}")]
    Internal(String),
}

// Implement From for common error types to enable `?` operator
impl From<std::io::Error> for SafelineError {
    fn from(err: std::io::Error) -> Self {
        SafelineError::Internal(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for SafelineError {
    fn from(err: serde_json::Error) -> Self {
        SafelineError::Internal(format!("JSON error: {}", err))
    }
}

impl From<String> for SafelineError {
    fn from(err: String) -> Self {
        SafelineError::Internal(err)
    }
}

impl From<&str> for SafelineError {
    fn from(err: &str) -> Self {
        SafelineError::Internal(err.to_string())
    }
}
