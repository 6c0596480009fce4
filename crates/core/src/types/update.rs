//! Partial updates for settings categories.
//!
//! Each update struct mirrors its settings struct with every field optional.
//! Merging follows one rule: a `Some` field replaces the current value, a
//! `None` field keeps it. The merged result is always a complete sub-object,
//! which is what gets written back to the remote document.

use serde::{Deserialize, Serialize};

use super::countdown::CountdownSettings;
use super::price::Price;
use super::shipping::{Province, ShippingSettings};
use super::social::SocialMedia;

/// Combine a complete value with a partial update.
pub trait Merge<U> {
    /// Return a copy of `self` with the fields set in `update` replaced.
    #[must_use]
    fn merged(&self, update: U) -> Self;
}

/// Partial update of [`CountdownSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountdownUpdate {
    pub enabled: Option<bool>,
    pub target_date: Option<String>,
    pub title: Option<String>,
}

impl CountdownUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.target_date.is_none() && self.title.is_none()
    }
}

impl Merge<CountdownUpdate> for CountdownSettings {
    fn merged(&self, update: CountdownUpdate) -> Self {
        Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            target_date: update
                .target_date
                .unwrap_or_else(|| self.target_date.clone()),
            title: update.title.unwrap_or_else(|| self.title.clone()),
        }
    }
}

/// Partial update of [`ShippingSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingUpdate {
    pub provinces: Option<Vec<Province>>,
    pub free_shipping_threshold: Option<Price>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl ShippingUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.provinces.is_none()
            && self.free_shipping_threshold.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

impl Merge<ShippingUpdate> for ShippingSettings {
    fn merged(&self, update: ShippingUpdate) -> Self {
        Self {
            provinces: update.provinces.unwrap_or_else(|| self.provinces.clone()),
            free_shipping_threshold: update
                .free_shipping_threshold
                .unwrap_or(self.free_shipping_threshold),
            min_price: update.min_price.unwrap_or(self.min_price),
            max_price: update.max_price.unwrap_or(self.max_price),
        }
    }
}

/// Partial update of [`SocialMedia`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialMediaUpdate {
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub youtube: Option<String>,
    pub tiktok: Option<String>,
    pub enabled: Option<bool>,
}

impl SocialMediaUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.instagram.is_none()
            && self.twitter.is_none()
            && self.facebook.is_none()
            && self.youtube.is_none()
            && self.tiktok.is_none()
            && self.enabled.is_none()
    }
}

impl Merge<SocialMediaUpdate> for SocialMedia {
    fn merged(&self, update: SocialMediaUpdate) -> Self {
        Self {
            instagram: update.instagram.unwrap_or_else(|| self.instagram.clone()),
            twitter: update.twitter.unwrap_or_else(|| self.twitter.clone()),
            facebook: update.facebook.unwrap_or_else(|| self.facebook.clone()),
            youtube: update.youtube.unwrap_or_else(|| self.youtube.clone()),
            tiktok: update.tiktok.unwrap_or_else(|| self.tiktok.clone()),
            enabled: update.enabled.unwrap_or(self.enabled),
        }
    }
}
