//! Error types for kharcha-core

use thiserror::Error;

/// Main error type for the kharcha-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error (storage unreachable, failed commit)
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid expense data (empty description, non-positive amount)
    #[error("validation error: {0}")]
    Validation(String),

    /// Batch import rejected (missing columns, unparseable row)
    #[error("import error: {0}")]
    Import(String),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for kharcha-core
pub type Result<T> = std::result::Result<T, Error>;
