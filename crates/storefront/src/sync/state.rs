//! Published local state.

use storefront_settings_core::SiteSettings;

/// Snapshot of everything the synchronizer publishes.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsState {
    /// Merged site settings, always fully populated.
    pub settings: SiteSettings,
    /// The site password was entered correctly this session.
    pub is_unlocked: bool,
    /// The admin gate is open on this device.
    pub is_admin: bool,
    /// No remote snapshot has been applied yet.
    pub is_loading: bool,
}

impl SettingsState {
    /// State before activation: defaults, both gates closed, loading.
    #[must_use]
    pub const fn initial(settings: SiteSettings) -> Self {
        Self {
            settings,
            is_unlocked: false,
            is_admin: false,
            is_loading: true,
        }
    }

    /// Whether visitors must enter the site password before browsing.
    #[must_use]
    pub const fn requires_password(&self) -> bool {
        self.settings.password_protection.enabled && !self.is_unlocked && !self.is_admin
    }
}
