//! Store construction, activation and teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures::StreamExt;
use serde_json::Value;
use storefront_settings_core::{Currency, STORE_CURRENCY, SiteSettings, paths};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::state::SettingsState;
use crate::error::{Result, SyncError};
use crate::notify::{Notifier, TracingNotifier};
use crate::remote::{DocumentStore, ValueStream};
use crate::storage::{KeyValueStorage, MemoryStorage, keys};

/// What activation found, or did, at the remote settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The document already existed and was left alone.
    Existing,
    /// The document was missing and the defaults were written.
    Seeded,
    /// The document could not be read, or the defaults could not be written.
    Failed,
}

/// Reactive, remotely synchronized site settings.
///
/// Cheaply cloneable; clones share one subscription and one published state.
/// Build with [`SiteSettingsStore::builder`], then call
/// [`activate`](Self::activate) once from inside a tokio runtime.
#[derive(Clone)]
pub struct SiteSettingsStore {
    pub(super) inner: Arc<StoreInner>,
}

pub(super) struct StoreInner {
    pub(super) remote: Arc<dyn DocumentStore>,
    pub(super) session: Arc<dyn KeyValueStorage>,
    pub(super) durable: Arc<dyn KeyValueStorage>,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) defaults: SiteSettings,
    pub(super) state: watch::Sender<SettingsState>,
    activated: AtomicBool,
    closed: AtomicBool,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

/// Builder for [`SiteSettingsStore`].
///
/// Session and durable storage default to in-memory storage, the notifier
/// to [`TracingNotifier`], and the defaults to [`SiteSettings::default`].
pub struct SiteSettingsStoreBuilder {
    remote: Arc<dyn DocumentStore>,
    session: Option<Arc<dyn KeyValueStorage>>,
    durable: Option<Arc<dyn KeyValueStorage>>,
    notifier: Option<Arc<dyn Notifier>>,
    defaults: Option<SiteSettings>,
}

impl SiteSettingsStoreBuilder {
    /// Storage for flags that last one session.
    #[must_use]
    pub fn session(mut self, storage: impl KeyValueStorage + 'static) -> Self {
        self.session = Some(Arc::new(storage));
        self
    }

    /// Storage for flags that survive restarts.
    #[must_use]
    pub fn durable(mut self, storage: impl KeyValueStorage + 'static) -> Self {
        self.durable = Some(Arc::new(storage));
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Settings used for seeding and for sub-objects missing remotely.
    #[must_use]
    pub fn defaults(mut self, defaults: SiteSettings) -> Self {
        self.defaults = Some(defaults);
        self
    }

    #[must_use]
    pub fn build(self) -> SiteSettingsStore {
        let defaults = self.defaults.unwrap_or_default();
        let (state, _) = watch::channel(SettingsState::initial(defaults.clone()));

        SiteSettingsStore {
            inner: Arc::new(StoreInner {
                remote: self.remote,
                session: self
                    .session
                    .unwrap_or_else(|| Arc::new(MemoryStorage::new())),
                durable: self
                    .durable
                    .unwrap_or_else(|| Arc::new(MemoryStorage::new())),
                notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
                defaults,
                state,
                activated: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                subscription: Mutex::new(None),
            }),
        }
    }
}

impl SiteSettingsStore {
    /// Start building a store backed by `remote`.
    pub fn builder(remote: impl DocumentStore + 'static) -> SiteSettingsStoreBuilder {
        SiteSettingsStoreBuilder {
            remote: Arc::new(remote),
            session: None,
            durable: None,
            notifier: None,
            defaults: None,
        }
    }

    /// Bring the store online.
    ///
    /// Reads the local gate flags, seeds the remote document with the
    /// defaults if it does not exist yet, and subscribes to live updates.
    /// Remote failures are logged and leave the store loading. Only the
    /// first call on a store does anything; later calls, and calls after
    /// [`shutdown`](Self::shutdown), return `None`.
    #[instrument(skip(self))]
    pub async fn activate(&self) -> Option<SeedOutcome> {
        if self.inner.activated.swap(true, Ordering::SeqCst) {
            debug!("Settings store already activated");
            return None;
        }
        if self.is_closed() {
            debug!("Settings store shut down before activation");
            return None;
        }

        self.load_local_flags();
        let outcome = self.seed_if_absent().await;
        self.start_subscription().await;
        Some(outcome)
    }

    /// Cancel the live subscription.
    ///
    /// Safe to call any number of times, and before activation. Operations
    /// still in flight finish their remote work, but their local state
    /// changes are dropped.
    pub fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.lock_subscription().take() {
            handle.abort();
            info!("Settings subscription cancelled");
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Current snapshot of the published state.
    #[must_use]
    pub fn state(&self) -> SettingsState {
        self.inner.state.borrow().clone()
    }

    /// Current merged settings.
    #[must_use]
    pub fn settings(&self) -> SiteSettings {
        self.inner.state.borrow().settings.clone()
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.inner.state.borrow().is_unlocked
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().is_admin
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    /// The store's display currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        STORE_CURRENCY
    }

    /// Receive every future state change.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<SettingsState> {
        self.inner.state.subscribe()
    }

    /// Wait until the first remote snapshot has been applied.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Inactive` if the state channel closes first.
    pub async fn wait_until_loaded(&self) -> Result<SiteSettings> {
        let mut states = self.subscribe_state();
        let state = states
            .wait_for(|state| !state.is_loading)
            .await
            .map_err(|_| SyncError::Inactive)?;
        Ok(state.settings.clone())
    }

    /// Apply a change to the published state, unless shut down.
    pub(super) fn update_local(&self, change: impl FnOnce(&mut SettingsState)) {
        apply_local(&self.inner, change);
    }

    fn load_local_flags(&self) {
        let is_unlocked = read_flag(self.inner.session.as_ref(), keys::SITE_UNLOCKED);
        let is_admin = read_flag(self.inner.durable.as_ref(), keys::ADMIN_LOGGED_IN);
        debug!(is_unlocked, is_admin, "Loaded local gate flags");

        self.update_local(|state| {
            state.is_unlocked = is_unlocked;
            state.is_admin = is_admin;
        });
    }

    /// Write the defaults if the remote document does not exist.
    async fn seed_if_absent(&self) -> SeedOutcome {
        let existing = match self.inner.remote.get(paths::SITE_SETTINGS).await {
            Ok(existing) => existing,
            Err(e) => {
                error!(error = %e, "Failed to read site settings, skipping seed");
                return SeedOutcome::Failed;
            }
        };
        if existing.as_ref().is_some_and(|doc| !doc.is_null()) {
            debug!("Site settings document exists");
            return SeedOutcome::Existing;
        }

        let seed = match serde_json::to_value(&self.inner.defaults) {
            Ok(seed) => seed,
            Err(e) => {
                error!(error = %e, "Failed to encode default site settings");
                return SeedOutcome::Failed;
            }
        };
        match self.inner.remote.set(paths::SITE_SETTINGS, &seed).await {
            Ok(()) => {
                info!("Seeded site settings with defaults");
                SeedOutcome::Seeded
            }
            Err(e) => {
                error!(error = %e, "Failed to seed site settings");
                SeedOutcome::Failed
            }
        }
    }

    async fn start_subscription(&self) {
        let values = match self.inner.remote.subscribe(paths::SITE_SETTINGS).await {
            Ok(values) => values,
            Err(e) => {
                error!(error = %e, "Failed to subscribe to site settings");
                return;
            }
        };

        let handle = tokio::spawn(consume_updates(Arc::downgrade(&self.inner), values));

        let mut slot = self.lock_subscription();
        if self.is_closed() {
            handle.abort();
            return;
        }
        *slot = Some(handle);
        info!("Subscribed to site settings");
    }

    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SiteSettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("SiteSettingsStore")
            .field("is_loading", &state.is_loading)
            .field("is_unlocked", &state.is_unlocked)
            .field("is_admin", &state.is_admin)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Merge every pushed snapshot into local state until the stream ends.
///
/// Holds the store weakly so dropping every handle also ends the task.
async fn consume_updates(inner: Weak<StoreInner>, mut values: ValueStream) {
    while let Some(item) = values.next().await {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        match item {
            Ok(snapshot) => apply_snapshot(&inner, snapshot.as_ref()),
            Err(e) => {
                error!(error = %e, "Site settings subscription failed");
                return;
            }
        }
    }
    warn!("Site settings subscription ended");
}

fn apply_snapshot(inner: &StoreInner, snapshot: Option<&Value>) {
    let settings = SiteSettings::from_snapshot(snapshot, &inner.defaults);
    debug!(present = snapshot.is_some(), "Applying site settings snapshot");
    apply_local(inner, |state| {
        state.settings = settings;
        state.is_loading = false;
    });
}

fn apply_local(inner: &StoreInner, change: impl FnOnce(&mut SettingsState)) {
    if inner.closed.load(Ordering::SeqCst) {
        debug!("Settings store shut down, discarding local update");
        return;
    }
    inner.state.send_modify(change);
}

fn read_flag(storage: &dyn KeyValueStorage, key: &str) -> bool {
    storage.flag(key).unwrap_or_else(|e| {
        warn!(key, error = %e, "Failed to read local flag");
        false
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use storefront_settings_core::Price;

    use super::*;
    use crate::remote::MemoryStore;

    async fn settled(store: &SiteSettingsStore) -> SiteSettings {
        tokio::time::timeout(Duration::from_secs(2), store.wait_until_loaded())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_activate_seeds_missing_document() {
        let remote = MemoryStore::new();
        let store = SiteSettingsStore::builder(remote.clone()).build();
        assert!(store.is_loading());

        store.activate().await;
        let settings = settled(&store).await;

        assert_eq!(settings, SiteSettings::default());
        assert_eq!(
            remote.snapshot(paths::SITE_SETTINGS),
            Some(serde_json::to_value(SiteSettings::default()).unwrap())
        );
    }

    #[tokio::test]
    async fn test_activate_keeps_existing_document() {
        let remote = MemoryStore::with_document(
            paths::SITE_SETTINGS,
            json!({ "shippingSettings": { "minPrice": 250 } }),
        )
        .unwrap();
        let store = SiteSettingsStore::builder(remote.clone()).build();

        store.activate().await;
        let settings = settled(&store).await;

        assert_eq!(settings.shipping_settings.min_price, Price::from_units(250));
        assert_eq!(remote.write_count(), 0);
    }

    #[tokio::test]
    async fn test_activate_twice_is_noop() {
        let remote = MemoryStore::new();
        let store = SiteSettingsStore::builder(remote.clone()).build();

        assert_eq!(store.activate().await, Some(SeedOutcome::Seeded));
        assert_eq!(store.activate().await, None);
        settled(&store).await;

        assert_eq!(remote.write_count(), 1);
    }

    #[tokio::test]
    async fn test_activate_reports_existing_document() {
        let remote = MemoryStore::with_document(paths::SITE_SETTINGS, json!({ "currency": "PKR" }))
            .unwrap();
        let store = SiteSettingsStore::builder(remote).build();

        assert_eq!(store.activate().await, Some(SeedOutcome::Existing));
    }

    #[tokio::test]
    async fn test_activate_reports_failed_seed_write() {
        let remote = MemoryStore::new();
        remote.set_read_only(true);
        let store = SiteSettingsStore::builder(remote.clone()).build();

        assert_eq!(store.activate().await, Some(SeedOutcome::Failed));
        assert_eq!(remote.snapshot(paths::SITE_SETTINGS), None);
        assert_eq!(remote.write_count(), 0);
    }

    #[tokio::test]
    async fn test_activate_reports_failed_read() {
        let remote = MemoryStore::new();
        remote.set_offline(true);
        let store = SiteSettingsStore::builder(remote).build();

        assert_eq!(store.activate().await, Some(SeedOutcome::Failed));
        assert!(store.is_loading());
    }

    #[tokio::test]
    async fn test_offline_remote_stays_loading() {
        let remote = MemoryStore::new();
        remote.set_offline(true);
        let store = SiteSettingsStore::builder(remote).build();

        store.activate().await;
        assert!(store.is_loading());
        assert_eq!(store.settings(), SiteSettings::default());
    }

    #[tokio::test]
    async fn test_live_update_reaches_local_state() {
        let remote = MemoryStore::new();
        let store = SiteSettingsStore::builder(remote.clone()).build();
        store.activate().await;
        settled(&store).await;

        let mut states = store.subscribe_state();
        remote
            .set(paths::COUNTDOWN, &json!({ "enabled": true, "title": "Launch" }))
            .await
            .unwrap();

        let state = tokio::time::timeout(
            Duration::from_secs(2),
            states.wait_for(|s| s.settings.countdown_settings.enabled),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        assert_eq!(state.settings.countdown_settings.title, "Launch");
    }

    #[tokio::test]
    async fn test_local_flags_read_on_activate() {
        let session = MemoryStorage::new();
        session.set(keys::SITE_UNLOCKED, "true").unwrap();
        let durable = MemoryStorage::new();
        durable.set(keys::ADMIN_LOGGED_IN, "false").unwrap();

        let store = SiteSettingsStore::builder(MemoryStore::new())
            .session(session)
            .durable(durable)
            .build();
        store.activate().await;

        assert!(store.is_unlocked());
        assert!(!store.is_admin());
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let store = SiteSettingsStore::builder(MemoryStore::new()).build();
        store.shutdown();
        store.shutdown();
        assert!(store.is_closed());

        let active = SiteSettingsStore::builder(MemoryStore::new()).build();
        active.activate().await;
        active.shutdown();
        active.shutdown();
        assert!(active.is_closed());
    }

    #[tokio::test]
    async fn test_updates_after_shutdown_are_discarded() {
        let remote = MemoryStore::new();
        let store = SiteSettingsStore::builder(remote.clone()).build();
        store.activate().await;
        settled(&store).await;
        store.shutdown();

        remote
            .set(paths::PASSWORD_ENABLED, &json!(true))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!store.settings().password_protection.enabled);
    }

    #[tokio::test]
    async fn test_currency_is_store_currency() {
        let store = SiteSettingsStore::builder(MemoryStore::new()).build();
        assert_eq!(store.currency(), STORE_CURRENCY);
    }
}
