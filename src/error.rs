//! Error types for the evaltrack service
//!
//! This module provides structured error handling using thiserror for
//! error definitions and anyhow for propagation at the binary boundary.

use thiserror::Error;

/// Main error type for evaltrack operations
#[derive(Error, Debug)]
pub enum EvalTrackError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// A relational constraint rejected a write (unknown course code
    /// on insert, or a colliding evaluation id)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for evaltrack operations
pub type Result<T> = std::result::Result<T, EvalTrackError>;

/// Convert rusqlite errors, separating constraint rejections from the rest
/// so the handler layer can branch on them.
impl From<rusqlite::Error> for EvalTrackError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                EvalTrackError::Constraint(err.to_string())
            }
            _ => EvalTrackError::Database(err.to_string()),
        }
    }
}

/// Convert anyhow::Error to EvalTrackError
impl From<anyhow::Error> for EvalTrackError {
    fn from(err: anyhow::Error) -> Self {
        EvalTrackError::Other(err.to_string())
    }
}
