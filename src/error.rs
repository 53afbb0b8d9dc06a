//! Error types for the item model migrator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using MigrateError.
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Main error type for resource pack migration.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read the client archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// HTTP failure while downloading the client archive.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The resource pack root does not exist.
    #[error("Input directory not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A legacy definition could not be interpreted.
    #[error("Invalid item definition: {0}")]
    InvalidDefinition(String),

    /// A model document is not present in the pack.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The fallback texture source could not be prepared.
    #[error("Fetch error: {0}")]
    Fetch(String),
}
