//! Settings mutation commands. All of them require the admin gate.

use storefront_settings_core::{CountdownUpdate, ShippingUpdate, SocialMediaUpdate};

use super::App;
use crate::error::CliError;

/// Turn the site password gate on or off.
pub async fn password_protection(app: &App, enabled: bool) -> Result<(), CliError> {
    admin_session(app).await?;
    app.store.toggle_password_protection(enabled).await?;
    Ok(())
}

/// Replace the site password.
pub async fn change_password(app: &App, new_password: &str) -> Result<(), CliError> {
    admin_session(app).await?;
    app.store.change_password(new_password).await?;
    Ok(())
}

pub async fn countdown(app: &App, update: CountdownUpdate) -> Result<(), CliError> {
    ensure_changes(update.is_empty())?;
    admin_session(app).await?;
    app.store.update_countdown_settings(update).await?;
    Ok(())
}

pub async fn shipping(app: &App, update: ShippingUpdate) -> Result<(), CliError> {
    ensure_changes(update.is_empty())?;
    admin_session(app).await?;
    app.store.update_shipping_settings(update).await?;
    Ok(())
}

pub async fn social(app: &App, update: SocialMediaUpdate) -> Result<(), CliError> {
    ensure_changes(update.is_empty())?;
    admin_session(app).await?;
    app.store.update_social_media_settings(update).await?;
    Ok(())
}

/// Load current settings, then check the admin gate.
///
/// Partial updates merge into the loaded copy, so it must be current.
async fn admin_session(app: &App) -> Result<(), CliError> {
    app.load().await?;
    app.require_admin()
}

fn ensure_changes(is_empty: bool) -> Result<(), CliError> {
    if is_empty {
        return Err(CliError::Failed(
            "Nothing to update: pass at least one option".to_string(),
        ));
    }
    Ok(())
}
