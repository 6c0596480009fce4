//! Gate checks and settings mutations.
//!
//! Mutations write to the remote document first and touch local state only
//! after the write succeeds. Every mutation reports its outcome through the
//! notifier; failures are also returned to the caller.

use serde::Serialize;
use serde_json::Value;
use storefront_settings_core::{
    ADMIN_CREDENTIALS, CountdownUpdate, Merge, ShippingUpdate, SocialMediaUpdate, paths,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::store::SiteSettingsStore;
use crate::error::{Result, SyncError};
use crate::notify::Notice;
use crate::storage::{FLAG_SET, keys};

impl SiteSettingsStore {
    /// Try to open the site password gate.
    ///
    /// Compares against the password currently stored remotely, never the
    /// cached copy. Returns `true` exactly when the input equals that
    /// password; an empty stored password is matched by empty input. Returns
    /// `false` when the remote cannot be read.
    #[instrument(skip_all)]
    pub async fn unlock_site(&self, password: &str) -> bool {
        if self.is_closed() {
            return false;
        }

        let current = match self.inner.remote.get(paths::PASSWORD).await {
            Ok(current) => current,
            Err(e) => {
                error!(error = %e, "Failed to read site password");
                return false;
            }
        };
        let matches = matches!(&current, Some(Value::String(expected)) if expected == password);
        if !matches {
            info!("Site unlock rejected");
            return false;
        }

        if let Err(e) = self.persist_unlock() {
            warn!(error = %e, "Failed to persist site unlock");
        }
        self.update_local(|state| state.is_unlocked = true);
        info!("Site unlocked");
        true
    }

    /// Turn the site password gate on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shut down or the remote write fails.
    #[instrument(skip(self))]
    pub async fn toggle_password_protection(&self, enabled: bool) -> Result<()> {
        self.write_remote(paths::PASSWORD_ENABLED, &enabled, "password protection")
            .await?;
        self.update_local(|state| state.settings.password_protection.enabled = enabled);
        self.notify(Notice::Success(if enabled {
            "Password protection enabled".to_string()
        } else {
            "Password protection disabled".to_string()
        }));
        Ok(())
    }

    /// Replace the site password. Stored as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shut down or the remote write fails.
    #[instrument(skip_all)]
    pub async fn change_password(&self, new_password: &str) -> Result<()> {
        self.write_remote(paths::PASSWORD, &new_password, "password")
            .await?;
        let password = new_password.to_owned();
        self.update_local(|state| state.settings.password_protection.password = password);
        self.notify(Notice::Success("Password updated".to_string()));
        Ok(())
    }

    /// Merge `update` into the countdown settings and write the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shut down or the remote write fails.
    #[instrument(skip(self))]
    pub async fn update_countdown_settings(&self, update: CountdownUpdate) -> Result<()> {
        let merged = self.settings().countdown_settings.merged(update);
        self.write_remote(paths::COUNTDOWN, &merged, "countdown settings")
            .await?;
        self.update_local(|state| state.settings.countdown_settings = merged);
        self.notify(Notice::Success("Countdown settings updated".to_string()));
        Ok(())
    }

    /// Merge `update` into the shipping settings and write the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shut down or the remote write fails.
    #[instrument(skip(self))]
    pub async fn update_shipping_settings(&self, update: ShippingUpdate) -> Result<()> {
        let merged = self.settings().shipping_settings.merged(update);
        self.write_remote(paths::SHIPPING, &merged, "shipping settings")
            .await?;
        self.update_local(|state| state.settings.shipping_settings = merged);
        self.notify(Notice::Success("Shipping settings updated".to_string()));
        Ok(())
    }

    /// Merge `update` into the social media settings and write the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is shut down or the remote write fails.
    #[instrument(skip(self))]
    pub async fn update_social_media_settings(&self, update: SocialMediaUpdate) -> Result<()> {
        let merged = self.settings().social_media.merged(update);
        self.write_remote(paths::SOCIAL_MEDIA, &merged, "social media settings")
            .await?;
        self.update_local(|state| state.settings.social_media = merged);
        self.notify(Notice::Success("Social media settings updated".to_string()));
        Ok(())
    }

    /// Try to open the admin gate on this device.
    ///
    /// Purely local: the pair is checked against the fixed admin login.
    #[instrument(skip(self, password))]
    pub fn admin_login(&self, email: &str, password: &str) -> bool {
        if self.is_closed() || !ADMIN_CREDENTIALS.matches(email, password) {
            info!("Admin login rejected");
            return false;
        }

        if let Err(e) = self.inner.durable.set(keys::ADMIN_LOGGED_IN, FLAG_SET) {
            warn!(error = %e, "Failed to persist admin login");
        }
        self.update_local(|state| state.is_admin = true);
        info!("Admin logged in");
        true
    }

    /// Close the admin gate on this device.
    ///
    /// The gate closes locally even if the durable flag cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable flag cannot be removed.
    pub fn admin_logout(&self) -> Result<()> {
        self.update_local(|state| state.is_admin = false);
        self.inner.durable.remove(keys::ADMIN_LOGGED_IN)?;
        info!("Admin logged out");
        Ok(())
    }

    fn persist_unlock(&self) -> Result<()> {
        self.inner.session.set(keys::SITE_UNLOCKED, FLAG_SET)?;
        self.inner
            .session
            .set(keys::AUTH_TOKEN, &Uuid::new_v4().to_string())?;
        Ok(())
    }

    /// Encode and write `value`, notifying the user if anything fails.
    async fn write_remote<T: Serialize + Sync>(
        &self,
        path: &str,
        value: &T,
        what: &str,
    ) -> Result<()> {
        let outcome = self.try_write_remote(path, value).await;
        if let Err(e) = &outcome {
            error!(path, error = %e, "Failed to update {what}");
            self.notify(Notice::Failure(format!("Failed to update {what}")));
        }
        outcome
    }

    async fn try_write_remote<T: Serialize + Sync>(&self, path: &str, value: &T) -> Result<()> {
        if self.is_closed() {
            return Err(SyncError::Inactive);
        }
        let value = serde_json::to_value(value)?;
        self.inner.remote.set(path, &value).await?;
        Ok(())
    }

    fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice);
    }
}
