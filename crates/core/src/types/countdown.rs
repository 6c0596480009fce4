//! Countdown banner settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Countdown banner shown above the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownSettings {
    /// Whether the banner is shown.
    pub enabled: bool,
    /// Moment the countdown reaches zero, as an ISO-8601 string.
    pub target_date: String,
    /// Banner headline.
    pub title: String,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            target_date: "2025-12-31T23:59:59.000Z".to_owned(),
            title: "Coming Soon".to_owned(),
        }
    }
}

impl CountdownSettings {
    /// Parse the target date.
    ///
    /// Returns `None` when the stored string is not a valid RFC 3339 timestamp.
    /// The raw string is kept as-is so an unparsable value never blocks a read.
    #[must_use]
    pub fn target(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.target_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Time left until the target date, clamped at zero.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let target = self.target()?;
        Some((target - now).max(chrono::Duration::zero()))
    }

    /// Whether the banner should currently be displayed.
    ///
    /// An enabled countdown whose target has passed is hidden.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.target().is_some_and(|target| target > now)
    }
}
