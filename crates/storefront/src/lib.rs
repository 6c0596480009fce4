//! Storefront site settings synchronizer.
//!
//! Keeps a reactive local copy of the storefront's site-wide settings
//! (countdown banner, password gate, shipping rules and social links) in
//! sync with a realtime document database, and exposes the site password
//! and admin access gates.
//!
//! # Example
//!
//! ```no_run
//! use storefront_settings::{MemoryStore, SiteSettingsStore};
//!
//! # async fn run() {
//! let store = SiteSettingsStore::builder(MemoryStore::new()).build();
//! store.activate().await;
//!
//! let settings = store.wait_until_loaded().await.unwrap();
//! println!("free shipping from {}", settings.shipping_settings.free_shipping_threshold);
//!
//! if store.unlock_site("welcome").await {
//!     println!("site unlocked");
//! }
//! store.shutdown();
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod context;
pub mod error;
pub mod notify;
pub mod remote;
pub mod storage;
pub mod sync;

pub use config::{ConfigError, FirebaseConfig, SettingsConfig};
pub use context::{SettingsProvider, try_use_site_settings, use_site_settings};
pub use error::{Result, SyncError};
pub use notify::{Notice, Notifier, TracingNotifier};
pub use remote::{DocumentStore, FirebaseStore, MemoryStore, StoreError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use sync::{SeedOutcome, SettingsState, SiteSettingsStore, SiteSettingsStoreBuilder};
