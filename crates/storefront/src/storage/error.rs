//! Error types for local persisted storage.

use thiserror::Error;

/// Errors that can occur when reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not hold a JSON object of strings.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
