//! Document paths in the remote store.
//!
//! Paths are `/`-separated keys from the database root, without leading or
//! trailing slashes.

/// The settings document.
pub const SITE_SETTINGS: &str = "siteSettings";

/// Countdown banner sub-object.
pub const COUNTDOWN: &str = "siteSettings/countdownSettings";

/// Password gate flag.
pub const PASSWORD_ENABLED: &str = "siteSettings/passwordProtection/enabled";

/// Plaintext site password.
pub const PASSWORD: &str = "siteSettings/passwordProtection/password";

/// Shipping rules sub-object.
pub const SHIPPING: &str = "siteSettings/shippingSettings";

/// Social links sub-object.
pub const SOCIAL_MEDIA: &str = "siteSettings/socialMedia";
