//! Error types for driftscan

use std::path::PathBuf;

use thiserror::Error;

/// driftscan error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// A column name that no dataset or column store holds.
    ///
    /// Fatal to the call that raised it; callers must not retry with the
    /// same name.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// Spill or reload failure in the column store.
    ///
    /// The store invalidates its active slot before surfacing this, so no
    /// stale resident column survives the failure.
    #[error("storage error at {}: {message}", path.display())]
    Storage {
        /// Path of the storage location involved in the failed operation.
        path: PathBuf,
        /// Description of the underlying failure.
        message: String,
    },

    /// HTTP transfer error while fetching a remote source.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Tabular format error while reading or writing a dataset.
    #[error("table format error: {0}")]
    Table(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
