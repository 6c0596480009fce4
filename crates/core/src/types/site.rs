//! The site settings document and its read-time merge.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::countdown::CountdownSettings;
use super::password::PasswordProtection;
use super::shipping::ShippingSettings;
use super::social::SocialMedia;

/// Top-level keys of the settings document.
pub mod sections {
    pub const COUNTDOWN: &str = "countdownSettings";
    pub const PASSWORD_PROTECTION: &str = "passwordProtection";
    pub const SHIPPING: &str = "shippingSettings";
    pub const SOCIAL_MEDIA: &str = "socialMedia";
}

/// All site-wide configuration, fully populated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub countdown_settings: CountdownSettings,
    pub password_protection: PasswordProtection,
    pub shipping_settings: ShippingSettings,
    pub social_media: SocialMedia,
}

impl SiteSettings {
    /// Build the merged view of a remote snapshot.
    ///
    /// `snapshot` is the value of the whole settings document, `None` when the
    /// document does not exist. Every sub-object is resolved independently:
    ///
    /// - absent or `null` falls back to the matching sub-object of `defaults`;
    /// - an object is overlaid onto the default, so fields missing remotely
    ///   keep their default value;
    /// - anything that fails to decode falls back to the default and is logged.
    #[must_use]
    pub fn from_snapshot(snapshot: Option<&Value>, defaults: &Self) -> Self {
        let section = |key: &str| snapshot.and_then(|doc| doc.get(key));

        Self {
            countdown_settings: resolve_section(
                section(sections::COUNTDOWN),
                &defaults.countdown_settings,
                sections::COUNTDOWN,
            ),
            password_protection: resolve_section(
                section(sections::PASSWORD_PROTECTION),
                &defaults.password_protection,
                sections::PASSWORD_PROTECTION,
            ),
            shipping_settings: resolve_section(
                section(sections::SHIPPING),
                &defaults.shipping_settings,
                sections::SHIPPING,
            ),
            social_media: resolve_section(
                section(sections::SOCIAL_MEDIA),
                &defaults.social_media,
                sections::SOCIAL_MEDIA,
            ),
        }
    }

    /// A copy safe to display, with the site password hidden.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            password_protection: self.password_protection.redacted(),
            ..self.clone()
        }
    }
}

fn resolve_section<T>(remote: Option<&Value>, default: &T, key: &str) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let remote = match remote {
        None | Some(Value::Null) => return default.clone(),
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            tracing::warn!(section = key, value = %other, "settings section is not an object, using default");
            return default.clone();
        }
    };

    let Ok(Value::Object(mut merged)) = serde_json::to_value(default) else {
        return default.clone();
    };
    for (field, value) in remote {
        if !value.is_null() {
            merged.insert(field.clone(), value.clone());
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
        tracing::warn!(section = key, error = %e, "settings section failed to decode, using default");
        default.clone()
    })
}
