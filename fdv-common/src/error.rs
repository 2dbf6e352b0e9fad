//! Common error types for FDV

use thiserror::Error;

/// Common result type for FDV operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the FDV crates
///
/// The normalization core never produces these; they come from the
/// storage and configuration layers around it.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be parsed as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
