//! Access gate commands: unlock, status and admin login/logout.

use storefront_settings_core::ADMIN_CREDENTIALS;

use super::App;
use super::summary::{countdown_line, shipping_line};
use crate::console;
use crate::error::CliError;

/// Check a site password against the remote value.
pub async fn unlock(app: &App, password: &str) -> Result<(), CliError> {
    app.store.activate().await;
    if app.store.unlock_site(password).await {
        console::line("Site unlocked");
        Ok(())
    } else {
        Err(CliError::Failed("Incorrect password".to_string()))
    }
}

/// Print the gate flags, whether visitors see the password page, and the
/// banner and shipping rules they are shown.
pub async fn status(app: &App) -> Result<(), CliError> {
    app.load().await?;
    let state = app.store.state();
    let protection = &state.settings.password_protection;

    console::line(&format!("password protection: {}", on_off(protection.enabled)));
    console::line(&format!("site unlocked:       {}", yes_no(state.is_unlocked)));
    console::line(&format!("admin logged in:     {}", yes_no(state.is_admin)));
    console::line(&format!("requires password:   {}", yes_no(state.requires_password())));
    console::line(&format!("currency:            {}", app.store.currency().code));
    console::line(&format!(
        "countdown:           {}",
        countdown_line(&state.settings.countdown_settings, chrono::Utc::now())
    ));
    console::line(&format!(
        "shipping:            {}",
        shipping_line(&state.settings.shipping_settings, app.store.currency())
    ));
    Ok(())
}

/// Open the admin gate on this device.
pub fn login(app: &App, email: &str, password: &str) -> Result<(), CliError> {
    if app.store.admin_login(email, password) {
        console::line(&format!("Logged in as {}", ADMIN_CREDENTIALS.email()));
        Ok(())
    } else {
        Err(CliError::Failed("Invalid admin credentials".to_string()))
    }
}

/// Close the admin gate on this device.
pub fn logout(app: &App) -> Result<(), CliError> {
    app.store.admin_logout()?;
    console::line("Logged out");
    Ok(())
}

const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
