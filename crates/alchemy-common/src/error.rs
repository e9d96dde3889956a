//! Error types shared by the alchemy crates.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for alchemy operations.
#[derive(Debug, Error)]
pub enum AlchemyError {
    /// Dataset loading errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a combination table from disk.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset file not found
    #[error("Dataset file not found: {0}")]
    NotFound(PathBuf),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The file extension is not a supported dataset format
    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },

    /// A row failed validation
    #[error("Dataset validation error: {0}")]
    Validation(String),
}

/// Result type alias for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type alias for alchemy operations.
pub type AlchemyResult<T> = Result<T, AlchemyError>;
