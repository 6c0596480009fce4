//! Site password and admin gates.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use storefront_settings::storage::keys;
use storefront_settings::{DocumentStore, FileStorage, KeyValueStorage, MemoryStorage, MemoryStore};
use storefront_settings_core::paths;
use storefront_settings_integration_tests::Device;

fn device(remote: &MemoryStore) -> Device {
    Device::new(
        remote.clone(),
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
    )
}

// =============================================================================
// Site password
// =============================================================================

#[tokio::test]
async fn test_unlock_accepts_only_the_current_remote_password() {
    let remote = MemoryStore::new();
    let device = device(&remote);
    device.start().await;

    for attempt in ["", "Welcome", "welcome ", "admin123"] {
        assert!(!device.store.unlock_site(attempt).await, "accepted {attempt:?}");
    }
    assert!(!device.store.is_unlocked());

    assert!(device.store.unlock_site("welcome").await);
    assert!(device.store.is_unlocked());
}

#[tokio::test]
async fn test_unlock_after_rotation_rejects_old_password() {
    let remote = MemoryStore::new();
    let visitor = device(&remote);
    visitor.start().await;

    remote
        .set(paths::PASSWORD, &json!("rotated"))
        .await
        .unwrap();

    assert!(!visitor.store.unlock_site("welcome").await);
    assert!(visitor.store.unlock_site("rotated").await);
}

#[tokio::test]
async fn test_unlock_lasts_for_the_session_only() {
    let remote = MemoryStore::new();
    let session: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());

    let tab = Device::new(
        remote.clone(),
        Arc::clone(&session),
        Arc::new(MemoryStorage::new()),
    );
    tab.start().await;
    assert!(tab.store.unlock_site("welcome").await);
    assert!(session.get(keys::AUTH_TOKEN).unwrap().is_some());

    // Same session, new store: still unlocked.
    let reload = Device::new(
        remote.clone(),
        Arc::clone(&session),
        Arc::new(MemoryStorage::new()),
    );
    reload.start().await;
    assert!(reload.store.is_unlocked());

    // New session: locked again.
    let fresh = device(&remote);
    fresh.start().await;
    assert!(!fresh.store.is_unlocked());
}

#[tokio::test]
async fn test_unlock_fails_closed_when_remote_is_down() {
    let remote = MemoryStore::new();
    let device = device(&remote);
    device.start().await;
    remote.set_offline(true);

    assert!(!device.store.unlock_site("welcome").await);
    assert!(!device.store.is_unlocked());
}

// =============================================================================
// Admin gate
// =============================================================================

#[tokio::test]
async fn test_admin_login_rejects_wrong_pair() {
    let device = device(&MemoryStore::new());
    assert!(!device.store.admin_login("x", "y"));
    assert!(!device.store.is_admin());
    assert!(device.durable.get(keys::ADMIN_LOGGED_IN).unwrap().is_none());
}

#[tokio::test]
async fn test_admin_login_survives_restart_until_logout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("device.json");
    let remote = MemoryStore::new();

    let open = |remote: &MemoryStore| {
        Device::new(
            remote.clone(),
            Arc::new(MemoryStorage::new()),
            Arc::new(FileStorage::new(&path)),
        )
    };

    let first = open(&remote);
    first.start().await;
    assert!(first.store.admin_login("admin@example.com", "admin123"));
    assert!(first.store.is_admin());

    let restarted = open(&remote);
    restarted.start().await;
    assert!(restarted.store.is_admin());

    restarted.store.admin_logout().unwrap();
    assert!(!restarted.store.is_admin());

    let after_logout = open(&remote);
    after_logout.start().await;
    assert!(!after_logout.store.is_admin());
}
