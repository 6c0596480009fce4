//! Read-side commands: show, seed and watch.

use storefront_settings::SeedOutcome;
use storefront_settings_core::SiteSettings;
use tracing::info;

use super::App;
use crate::console;
use crate::error::CliError;

/// Print the merged settings as JSON.
pub async fn show(app: &App, reveal: bool) -> Result<(), CliError> {
    let settings = app.load().await?;
    console::line(&render(&settings, reveal)?);
    Ok(())
}

/// Seed the remote document with the defaults if it does not exist.
///
/// Fails when the document could not be read or the defaults could not be
/// written, instead of waiting for a snapshot that will never arrive.
pub async fn seed(app: &App) -> Result<(), CliError> {
    let message = seed_message(app.store.activate().await)?;
    app.load().await?;
    console::line(message);
    Ok(())
}

fn seed_message(outcome: Option<SeedOutcome>) -> Result<&'static str, CliError> {
    match outcome {
        Some(SeedOutcome::Existing) => Ok("Site settings already exist; nothing seeded"),
        Some(SeedOutcome::Seeded) => Ok("Seeded site settings with defaults"),
        Some(SeedOutcome::Failed) => {
            Err(CliError::Failed("Failed to seed site settings".to_string()))
        }
        None => Err(CliError::Failed("Settings store already activated".to_string())),
    }
}

/// Print every settings change until Ctrl-C.
pub async fn watch(app: &App, reveal: bool) -> Result<(), CliError> {
    let mut current = app.load().await?;
    console::line(&render(&current, reveal)?);

    let mut states = app.store.subscribe_state();
    info!("Watching site settings, press Ctrl-C to stop");

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let settings = states.borrow_and_update().settings.clone();
                if settings != current {
                    console::line(&render(&settings, reveal)?);
                    current = settings;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Stopping watch");
                break;
            }
        }
    }
    Ok(())
}

fn render(settings: &SiteSettings, reveal: bool) -> Result<String, CliError> {
    let settings = if reveal {
        settings.clone()
    } else {
        settings.redacted()
    };
    Ok(serde_json::to_string_pretty(&settings)?)
}
