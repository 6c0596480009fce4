//! Storefront settings CLI - inspect and edit site-wide settings.
//!
//! # Usage
//!
//! ```bash
//! # Print the merged settings (password hidden)
//! sfs show
//!
//! # Follow live changes until Ctrl-C
//! sfs watch
//!
//! # Open the admin gate on this device, then edit settings
//! sfs admin login -e admin@example.com -p admin123
//! sfs shipping --min-price 400
//! sfs countdown --enabled true --title "Eid Sale"
//! sfs password set spring-sale
//! ```
//!
//! # Commands
//!
//! - `show` / `seed` / `watch` - Read settings
//! - `unlock` / `status` / `admin` - Access gates
//! - `quote` - Shipping charge for an order subtotal
//! - `password` / `countdown` / `shipping` / `social` - Edit settings (admin only)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use storefront_settings::SettingsConfig;
use storefront_settings::config::load_provinces;
use storefront_settings_core::{CountdownUpdate, Price, ShippingUpdate, SocialMediaUpdate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod console;
mod error;

use commands::App;
use error::CliError;

#[derive(Parser)]
#[command(name = "sfs")]
#[command(author, version, about = "Storefront site settings tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged site settings as JSON
    Show {
        /// Include the site password in the output
        #[arg(long)]
        reveal: bool,
    },
    /// Write the default settings if the remote document does not exist
    Seed,
    /// Print every settings change until Ctrl-C
    Watch {
        /// Include the site password in the output
        #[arg(long)]
        reveal: bool,
    },
    /// Check a site password
    Unlock {
        /// Password to try
        password: String,
    },
    /// Print the access gate flags
    Status,
    /// Show the shipping charge for an order subtotal
    Quote {
        /// Order subtotal in the store currency
        subtotal: Price,
    },
    /// Admin gate on this device
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Site password protection
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
    /// Update the countdown banner
    Countdown {
        #[arg(long)]
        enabled: Option<bool>,

        /// RFC 3339 timestamp, e.g. 2025-12-31T23:59:59.000Z
        #[arg(long, value_parser = parse_target_date)]
        target_date: Option<String>,

        #[arg(long)]
        title: Option<String>,
    },
    /// Update shipping rules
    Shipping {
        #[arg(long)]
        min_price: Option<Price>,

        #[arg(long)]
        max_price: Option<Price>,

        #[arg(long)]
        free_shipping_threshold: Option<Price>,

        /// JSON file holding the full province table
        #[arg(long)]
        provinces_file: Option<PathBuf>,
    },
    /// Update social media links
    Social {
        #[arg(long)]
        instagram: Option<String>,

        #[arg(long)]
        twitter: Option<String>,

        #[arg(long)]
        facebook: Option<String>,

        #[arg(long)]
        youtube: Option<String>,

        #[arg(long)]
        tiktok: Option<String>,

        /// Show or hide the links
        #[arg(long)]
        enabled: Option<bool>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Log in as the store admin
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Log out
    Logout,
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Require the site password
    Enable,
    /// Stop requiring the site password
    Disable,
    /// Replace the site password
    Set {
        /// New password, stored as given
        password: String,
    },
}

fn parse_target_date(raw: &str) -> Result<String, String> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|_| raw.to_owned())
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SettingsConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration before tracing so Sentry can be initialized first
    let config = SettingsConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_settings=info,storefront_settings_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &SettingsConfig) -> Result<(), CliError> {
    let app = App::open(config)?;
    let result = dispatch(cli.command, &app).await;
    app.store.shutdown();
    result
}

async fn dispatch(command: Commands, app: &App) -> Result<(), CliError> {
    match command {
        Commands::Show { reveal } => commands::settings::show(app, reveal).await,
        Commands::Seed => commands::settings::seed(app).await,
        Commands::Watch { reveal } => commands::settings::watch(app, reveal).await,
        Commands::Unlock { password } => commands::gate::unlock(app, &password).await,
        Commands::Status => commands::gate::status(app).await,
        Commands::Quote { subtotal } => commands::summary::quote(app, subtotal).await,
        Commands::Admin { action } => match action {
            AdminAction::Login { email, password } => {
                commands::gate::login(app, &email, &password)
            }
            AdminAction::Logout => commands::gate::logout(app),
        },
        Commands::Password { action } => match action {
            PasswordAction::Enable => commands::edit::password_protection(app, true).await,
            PasswordAction::Disable => commands::edit::password_protection(app, false).await,
            PasswordAction::Set { password } => {
                commands::edit::change_password(app, &password).await
            }
        },
        Commands::Countdown {
            enabled,
            target_date,
            title,
        } => {
            let update = CountdownUpdate {
                enabled,
                target_date,
                title,
            };
            commands::edit::countdown(app, update).await
        }
        Commands::Shipping {
            min_price,
            max_price,
            free_shipping_threshold,
            provinces_file,
        } => {
            let provinces = provinces_file
                .as_deref()
                .map(load_provinces)
                .transpose()?;
            let update = ShippingUpdate {
                provinces,
                free_shipping_threshold,
                min_price,
                max_price,
            };
            commands::edit::shipping(app, update).await
        }
        Commands::Social {
            instagram,
            twitter,
            facebook,
            youtube,
            tiktok,
            enabled,
        } => {
            let update = SocialMediaUpdate {
                instagram,
                twitter,
                facebook,
                youtube,
                tiktok,
                enabled,
            };
            commands::edit::social(app, update).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_shipping_prices() {
        let cli = Cli::try_parse_from(["sfs", "shipping", "--min-price", "400"]).unwrap_or_else(
            |e| panic!("{e}"),
        );
        let Commands::Shipping { min_price, max_price, .. } = cli.command else {
            panic!("expected shipping command");
        };
        assert_eq!(min_price, Some(Price::from_units(400)));
        assert!(max_price.is_none());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        assert!(Cli::try_parse_from(["sfs", "shipping", "--min-price", "-1"]).is_err());
    }

    #[test]
    fn test_parse_quote_subtotal() {
        let cli = Cli::try_parse_from(["sfs", "quote", "4999.50"]).unwrap_or_else(|e| panic!("{e}"));
        let Commands::Quote { subtotal } = cli.command else {
            panic!("expected quote command");
        };
        assert_eq!(subtotal, "4999.50".parse::<Price>().unwrap_or_else(|e| panic!("{e}")));
        assert!(Cli::try_parse_from(["sfs", "quote"]).is_err());
    }

    #[test]
    fn test_target_date_must_be_rfc3339() {
        assert!(parse_target_date("2025-12-31T23:59:59.000Z").is_ok());
        assert!(parse_target_date("next friday").is_err());
    }
}
