//! Task-scoped provisioning of the settings store.
//!
//! Code that takes a [`SiteSettingsStore`] argument should keep doing so.
//! This module is for code that expects the store to be ambiently
//! available, the way UI components consume a context: wrap the work in
//! [`SettingsProvider::scope`] and call [`use_site_settings`] inside it.

use std::future::Future;

use crate::sync::SiteSettingsStore;

tokio::task_local! {
    static SITE_SETTINGS: SiteSettingsStore;
}

/// Provides a [`SiteSettingsStore`] to everything run inside its scope.
#[derive(Debug, Clone, Copy)]
pub struct SettingsProvider;

impl SettingsProvider {
    /// Run `future` with `store` provisioned.
    pub async fn scope<F: Future>(store: SiteSettingsStore, future: F) -> F::Output {
        SITE_SETTINGS.scope(store, future).await
    }

    /// Run `f` synchronously with `store` provisioned.
    pub fn sync_scope<R>(store: SiteSettingsStore, f: impl FnOnce() -> R) -> R {
        SITE_SETTINGS.sync_scope(store, f)
    }
}

/// The provisioned settings store.
///
/// # Panics
///
/// Panics when called outside a [`SettingsProvider`] scope. Consuming the
/// settings without a provider is a programming error.
#[must_use]
pub fn use_site_settings() -> SiteSettingsStore {
    try_use_site_settings().unwrap_or_else(|| {
        panic!("use_site_settings must be used within a SettingsProvider scope")
    })
}

/// The provisioned settings store, or `None` outside a provider scope.
#[must_use]
pub fn try_use_site_settings() -> Option<SiteSettingsStore> {
    SITE_SETTINGS.try_with(SiteSettingsStore::clone).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::remote::MemoryStore;

    #[test]
    fn test_try_use_outside_scope_is_none() {
        assert!(try_use_site_settings().is_none());
    }

    #[test]
    #[should_panic(expected = "within a SettingsProvider scope")]
    fn test_use_outside_scope_panics() {
        let _ = use_site_settings();
    }

    #[tokio::test]
    async fn test_scope_provides_the_same_store() {
        let store = SiteSettingsStore::builder(MemoryStore::new()).build();

        let is_admin = SettingsProvider::scope(store.clone(), async {
            assert!(use_site_settings().admin_login("admin@example.com", "admin123"));
            use_site_settings().is_admin()
        })
        .await;

        assert!(is_admin);
        assert!(store.is_admin());
    }

    #[test]
    fn test_sync_scope() {
        let store = SiteSettingsStore::builder(MemoryStore::new()).build();
        let loading = SettingsProvider::sync_scope(store, || use_site_settings().is_loading());
        assert!(loading);
    }
}
