//! Social media links.

use serde::{Deserialize, Serialize};

/// Social profile links shown in the storefront footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    pub instagram: String,
    pub twitter: String,
    pub facebook: String,
    pub youtube: String,
    pub tiktok: String,
    /// Whether the links are shown at all.
    pub enabled: bool,
}

impl Default for SocialMedia {
    fn default() -> Self {
        Self {
            instagram: String::new(),
            twitter: String::new(),
            facebook: String::new(),
            youtube: String::new(),
            tiktok: String::new(),
            enabled: true,
        }
    }
}

impl SocialMedia {
    /// Links to display as `(platform, url)` pairs.
    ///
    /// Empty when the section is disabled; blank URLs are skipped.
    pub fn visible_links(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("instagram", self.instagram.as_str()),
            ("twitter", self.twitter.as_str()),
            ("facebook", self.facebook.as_str()),
            ("youtube", self.youtube.as_str()),
            ("tiktok", self.tiktok.as_str()),
        ]
        .into_iter()
        .filter(move |(_, url)| self.enabled && !url.trim().is_empty())
    }
}
