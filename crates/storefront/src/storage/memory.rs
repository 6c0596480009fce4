//! Process-lifetime storage.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{KeyValueStorage, StorageError};

/// Storage that lives as long as the value does.
///
/// Used as session storage: a new process starts with nothing unlocked.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::keys;

    #[test]
    fn test_flag_round_trip() {
        let storage = MemoryStorage::new();
        assert!(!storage.flag(keys::SITE_UNLOCKED).unwrap());

        storage.set(keys::SITE_UNLOCKED, "true").unwrap();
        assert!(storage.flag(keys::SITE_UNLOCKED).unwrap());

        storage.remove(keys::SITE_UNLOCKED).unwrap();
        assert!(storage.get(keys::SITE_UNLOCKED).unwrap().is_none());
    }

    #[test]
    fn test_flag_only_accepts_true() {
        let storage = MemoryStorage::new();
        storage.set(keys::ADMIN_LOGGED_IN, "yes").unwrap();
        assert!(!storage.flag(keys::ADMIN_LOGGED_IN).unwrap());
    }
}
