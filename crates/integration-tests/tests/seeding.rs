//! First-run seeding and the merged read view.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use storefront_settings::{DocumentStore, MemoryStorage, MemoryStore, SeedOutcome};
use storefront_settings_core::{Price, SiteSettings, paths};
use storefront_settings_integration_tests::Device;

fn device(remote: &MemoryStore) -> Device {
    Device::new(
        remote.clone(),
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
    )
}

// =============================================================================
// Seeding
// =============================================================================

#[tokio::test]
async fn test_empty_database_is_seeded_with_defaults() {
    let remote = MemoryStore::new();
    let settings = device(&remote).start().await;

    assert_eq!(settings, SiteSettings::default());
    let seeded = remote.snapshot(paths::SITE_SETTINGS).unwrap();
    assert_eq!(seeded["passwordProtection"]["password"], json!("welcome"));
    assert_eq!(seeded["shippingSettings"]["freeShippingThreshold"], json!(5000));
    assert_eq!(seeded["socialMedia"]["enabled"], json!(true));
}

#[tokio::test]
async fn test_seeding_twice_never_overwrites() {
    let remote = MemoryStore::new();
    let first = device(&remote);
    first.start().await;

    // An edit made after the first seed must survive a second start.
    remote
        .set(paths::PASSWORD, &json!("edited"))
        .await
        .unwrap();
    let writes = remote.write_count();

    let second = device(&remote);
    let settings = second.start().await;

    assert_eq!(settings.password_protection.password, "edited");
    assert_eq!(remote.write_count(), writes);
}

#[tokio::test]
async fn test_unreachable_database_is_not_seeded() {
    let remote = MemoryStore::new();
    remote.set_offline(true);
    let device = device(&remote);
    device.store.activate().await;

    assert!(device.store.is_loading());
    remote.set_offline(false);
    assert!(remote.snapshot(paths::SITE_SETTINGS).is_none());
}

#[tokio::test]
async fn test_rejected_seed_write_is_reported() {
    let remote = MemoryStore::new();
    remote.set_read_only(true);

    let blocked = device(&remote);
    assert_eq!(blocked.store.activate().await, Some(SeedOutcome::Failed));
    assert!(remote.snapshot(paths::SITE_SETTINGS).is_none());
    blocked.store.shutdown();

    // The next device with write access still seeds.
    remote.set_read_only(false);
    let next = device(&remote);
    assert_eq!(next.store.activate().await, Some(SeedOutcome::Seeded));
    assert!(remote.snapshot(paths::SITE_SETTINGS).is_some());
}

// =============================================================================
// Merged view
// =============================================================================

#[tokio::test]
async fn test_every_missing_sub_object_uses_its_default() {
    let defaults = SiteSettings::default();
    let cases = [
        (
            "countdownSettings",
            json!({ "enabled": true, "targetDate": "2026-01-01T00:00:00Z", "title": "Soon" }),
        ),
        (
            "passwordProtection",
            json!({ "enabled": true, "password": "pw" }),
        ),
        (
            "shippingSettings",
            json!({ "provinces": [], "freeShippingThreshold": 1, "minPrice": 1, "maxPrice": 2 }),
        ),
        (
            "socialMedia",
            json!({ "instagram": "https://instagram.com/x", "enabled": false }),
        ),
    ];

    for (present, value) in cases {
        let mut document = serde_json::Map::new();
        document.insert(present.to_owned(), value);
        let remote =
            MemoryStore::with_document(paths::SITE_SETTINGS, document.into()).unwrap();
        let settings = device(&remote).start().await;

        if present != "countdownSettings" {
            assert_eq!(settings.countdown_settings, defaults.countdown_settings);
        }
        if present != "passwordProtection" {
            assert_eq!(settings.password_protection, defaults.password_protection);
        }
        if present != "shippingSettings" {
            assert_eq!(settings.shipping_settings, defaults.shipping_settings);
        }
        if present != "socialMedia" {
            assert_eq!(settings.social_media, defaults.social_media);
        }
    }
}

#[tokio::test]
async fn test_sub_object_removed_by_live_update_reverts_to_default() {
    let remote = MemoryStore::with_document(
        paths::SITE_SETTINGS,
        json!({ "shippingSettings": { "minPrice": 999 } }),
    )
    .unwrap();
    let device = device(&remote);
    let settings = device.start().await;
    assert_eq!(settings.shipping_settings.min_price, Price::from_units(999));

    remote.set(paths::SHIPPING, &serde_json::Value::Null).await.unwrap();

    let state = device
        .wait_for(|s| s.settings.shipping_settings.min_price == Price::from_units(300))
        .await;
    assert_eq!(
        state.settings.shipping_settings,
        SiteSettings::default().shipping_settings
    );
}
