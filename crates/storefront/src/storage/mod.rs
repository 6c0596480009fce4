//! Local persisted storage for gate flags.
//!
//! Two independent stores back the access gates:
//! - session storage, cleared when the session ends ([`MemoryStorage`]);
//! - durable storage, kept across restarts ([`FileStorage`]).
//!
//! Both hold plain string values; flags are stored as `"true"` or absent.

use std::sync::Arc;

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Value stored for a set flag.
pub const FLAG_SET: &str = "true";

/// Storage keys used by the access gates.
pub mod keys {
    /// Session key set after a correct site password.
    pub const SITE_UNLOCKED: &str = "siteUnlocked";

    /// Session key holding the opaque token issued on unlock.
    pub const AUTH_TOKEN: &str = "authToken";

    /// Durable key set after a successful admin login.
    pub const ADMIN_LOGGED_IN: &str = "adminLoggedIn";
}

/// A string key-value store.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Whether `key` holds the set-flag value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn flag(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.as_deref() == Some(FLAG_SET))
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
