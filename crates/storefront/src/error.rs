//! Error type for settings synchronizer operations.
//!
//! Mutations report failures twice: once to the user through the configured
//! [`Notifier`](crate::notify::Notifier), and once to the caller as a
//! [`SyncError`] so non-interactive callers can act on it. Login and unlock
//! never fail; they answer `false`.

use thiserror::Error;

use crate::remote::StoreError;
use crate::storage::StorageError;

/// Errors returned by [`SiteSettingsStore`](crate::sync::SiteSettingsStore).
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote document store failed.
    #[error("Remote store error: {0}")]
    Store(#[from] StoreError),

    /// Local persisted storage failed.
    #[error("Local storage error: {0}")]
    Storage(#[from] StorageError),

    /// A settings value could not be encoded for the remote document.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The store has been shut down.
    #[error("Settings store has been shut down")]
    Inactive,
}

/// Result alias for synchronizer operations.
pub type Result<T> = std::result::Result<T, SyncError>;
