//! Shared harness for the storefront settings integration tests.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no network)
//! cargo test -p storefront-settings-integration-tests
//!
//! # Live Firebase tests
//! FIREBASE_DATABASE_URL=https://... cargo test -p storefront-settings-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `seeding` - First-run seeding and the merged read view
//! - `gates` - Site password and admin gates
//! - `updates` - Partial updates and concurrent writers
//! - `firebase_live` - Same contract against a real database

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use storefront_settings::{
    DocumentStore, KeyValueStorage, Notice, Notifier, SettingsState, SiteSettingsStore,
};
use storefront_settings_core::SiteSettings;

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(5);

/// Notifier that keeps every notice for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier(Arc<Mutex<Vec<Notice>>>);

impl RecordingNotifier {
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.0.lock().unwrap().push(notice);
    }
}

/// One simulated visitor device: a store plus its local storage.
pub struct Device {
    pub store: SiteSettingsStore,
    pub session: Arc<dyn KeyValueStorage>,
    pub durable: Arc<dyn KeyValueStorage>,
    pub notifier: RecordingNotifier,
}

impl Device {
    /// Build a device with the given storages and the fixed defaults.
    pub fn new(
        remote: impl DocumentStore + 'static,
        session: Arc<dyn KeyValueStorage>,
        durable: Arc<dyn KeyValueStorage>,
    ) -> Self {
        Self::with_defaults(remote, session, durable, SiteSettings::default())
    }

    pub fn with_defaults(
        remote: impl DocumentStore + 'static,
        session: Arc<dyn KeyValueStorage>,
        durable: Arc<dyn KeyValueStorage>,
        defaults: SiteSettings,
    ) -> Self {
        let notifier = RecordingNotifier::default();
        let store = SiteSettingsStore::builder(remote)
            .session(Arc::clone(&session))
            .durable(Arc::clone(&durable))
            .notifier(notifier.clone())
            .defaults(defaults)
            .build();
        Self {
            store,
            session,
            durable,
            notifier,
        }
    }

    /// Activate and wait for the first snapshot.
    pub async fn start(&self) -> SiteSettings {
        self.store.activate().await;
        tokio::time::timeout(WAIT, self.store.wait_until_loaded())
            .await
            .unwrap()
            .unwrap()
    }

    /// Wait until the published state satisfies `condition`.
    pub async fn wait_for(&self, condition: impl FnMut(&SettingsState) -> bool) -> SettingsState {
        let mut states = self.store.subscribe_state();
        tokio::time::timeout(WAIT, states.wait_for(condition))
            .await
            .unwrap()
            .unwrap()
            .clone()
    }
}
