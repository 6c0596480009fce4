//! Core types for the storefront site settings.
//!
//! This module provides the settings document, its sub-objects, and the
//! partial updates applied to them.

pub mod countdown;
pub mod credential;
pub mod password;
pub mod price;
pub mod shipping;
pub mod site;
pub mod social;
pub mod update;

pub use countdown::CountdownSettings;
pub use credential::{ADMIN_CREDENTIALS, AdminCredentials};
pub use password::PasswordProtection;
pub use price::{Currency, Price, PriceError, STORE_CURRENCY};
pub use shipping::{Province, ShippingSettings};
pub use site::SiteSettings;
pub use social::SocialMedia;
pub use update::{CountdownUpdate, Merge, ShippingUpdate, SocialMediaUpdate};
