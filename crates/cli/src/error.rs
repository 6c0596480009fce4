//! CLI error type.

use storefront_settings::{ConfigError, StoreError, SyncError};
use thiserror::Error;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A settings command was run without the admin gate open.
    #[error("Admin login required: run `sfs admin login` first")]
    NotAdmin,

    #[error("{0}")]
    Failed(String),
}
