//! The site settings synchronizer.
//!
//! [`SiteSettingsStore`] keeps a local, merged copy of the remote
//! `siteSettings` document current through a live subscription, exposes the
//! two access gates (site password and admin login), and writes settings
//! changes back to the remote document.

mod operations;
mod state;
mod store;

pub use state::SettingsState;
pub use store::{SeedOutcome, SiteSettingsStore, SiteSettingsStoreBuilder};
