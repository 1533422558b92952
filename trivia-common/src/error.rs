//! Common error types for the trivia loader

use thiserror::Error;

/// Common result type for loader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared across the workspace
///
/// Nothing here is retried; every failure propagates to the caller and
/// terminates the current run.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed row or column in a season export file
    #[error("Parse error: {0}")]
    Parse(String),

    /// Record failed field-schema validation before insertion
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Natural-key resolution returned zero or multiple rows
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
