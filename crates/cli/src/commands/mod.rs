//! Command implementations.
//!
//! Every command opens an [`App`], does its work through the
//! [`SiteSettingsStore`] contract, and leaves teardown to the caller.

pub mod edit;
pub mod gate;
pub mod settings;
pub mod summary;

use std::time::Duration;

use storefront_settings::{FileStorage, FirebaseStore, SettingsConfig, SiteSettingsStore};
use storefront_settings_core::SiteSettings;

use crate::console::ConsoleNotifier;
use crate::error::CliError;

/// How long to wait for the first remote snapshot.
const LOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// A configured store.
pub struct App {
    pub store: SiteSettingsStore,
}

impl App {
    /// Build the store from configuration. Nothing touches the network yet.
    ///
    /// Session storage lives as long as the process; durable storage is the
    /// device file under the state directory.
    pub fn open(config: &SettingsConfig) -> Result<Self, CliError> {
        let remote = FirebaseStore::new(&config.firebase)?;
        let store = SiteSettingsStore::builder(remote)
            .durable(FileStorage::new(config.durable_storage_path()))
            .notifier(ConsoleNotifier)
            .defaults(config.default_settings()?)
            .build();
        Ok(Self { store })
    }

    /// Activate the store and wait for the first snapshot.
    pub async fn load(&self) -> Result<SiteSettings, CliError> {
        self.store.activate().await;
        tokio::time::timeout(LOAD_TIMEOUT, self.store.wait_until_loaded())
            .await
            .map_err(|_| CliError::Failed("Timed out waiting for site settings".to_string()))?
            .map_err(CliError::from)
    }

    /// Refuse to continue unless the admin gate is open.
    pub fn require_admin(&self) -> Result<(), CliError> {
        if self.store.is_admin() {
            Ok(())
        } else {
            Err(CliError::NotAdmin)
        }
    }
}
