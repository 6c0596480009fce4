//! Settings synchronizer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FIREBASE_DATABASE_URL` - Base URL of the Realtime Database
//!   (e.g., <https://your-project-default-rtdb.firebaseio.com>)
//!
//! ## Optional
//! - `FIREBASE_AUTH_TOKEN` - Database secret or ID token, sent as `auth`
//! - `SETTINGS_STATE_DIR` - Directory of durable local state (default: .storefront-settings)
//! - `SETTINGS_PROVINCES_FILE` - JSON array used as the default province table
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde_json::Value;
use storefront_settings_core::{Province, SiteSettings};
use thiserror::Error;
use url::Url;

/// Default directory of durable local state.
pub const DEFAULT_STATE_DIR: &str = ".storefront-settings";

/// File name of durable storage inside the state directory.
pub const DURABLE_STORAGE_FILE: &str = "device.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid provinces file {0}: {1}")]
    InvalidProvincesFile(String, String),
}

/// Synchronizer configuration.
#[derive(Debug, Clone)]
pub struct SettingsConfig {
    /// Realtime Database connection
    pub firebase: FirebaseConfig,
    /// Directory holding durable local state
    pub state_dir: PathBuf,
    /// JSON file with the default province table
    pub provinces_file: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Firebase Realtime Database configuration.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Database base URL
    pub database_url: Url,
    /// Token appended to every request as the `auth` query parameter
    pub auth_token: Option<SecretString>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("database_url", &self.database_url.as_str())
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl SettingsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(vars);

        let firebase = FirebaseConfig {
            database_url: parse_database_url(&env.required("FIREBASE_DATABASE_URL")?)?,
            auth_token: env.optional("FIREBASE_AUTH_TOKEN").map(SecretString::from),
        };

        Ok(Self {
            firebase,
            state_dir: PathBuf::from(env.or_default("SETTINGS_STATE_DIR", DEFAULT_STATE_DIR)),
            provinces_file: env.optional("SETTINGS_PROVINCES_FILE").map(PathBuf::from),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Path of the durable storage file.
    #[must_use]
    pub fn durable_storage_path(&self) -> PathBuf {
        self.state_dir.join(DURABLE_STORAGE_FILE)
    }

    /// The fixed defaults, with the configured province table if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidProvincesFile` if the provinces file
    /// cannot be read or is not a JSON array.
    pub fn default_settings(&self) -> Result<SiteSettings, ConfigError> {
        let mut settings = SiteSettings::default();
        if let Some(path) = &self.provinces_file {
            settings.shipping_settings.provinces = load_provinces(path)?;
        }
        Ok(settings)
    }
}

/// Read a province table from a JSON file.
///
/// # Errors
///
/// Returns `ConfigError::InvalidProvincesFile` if the file is unreadable or
/// does not hold a JSON array.
pub fn load_provinces(path: &Path) -> Result<Vec<Province>, ConfigError> {
    let invalid = |message: String| {
        ConfigError::InvalidProvincesFile(path.display().to_string(), message)
    };

    let contents = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;

    match value {
        Value::Array(entries) => Ok(entries.into_iter().map(Province::new).collect()),
        _ => Err(invalid("expected a JSON array".to_string())),
    }
}

/// Validate the database URL. Only http(s) URLs are usable by the REST API.
fn parse_database_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidEnvVar("FIREBASE_DATABASE_URL".to_string(), e.to_string())
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "FIREBASE_DATABASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual required/optional/default accessors.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SettingsConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SettingsConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_database_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "FIREBASE_DATABASE_URL"));
    }

    #[test]
    fn test_invalid_database_url() {
        let err = load(&[("FIREBASE_DATABASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = load(&[("FIREBASE_DATABASE_URL", "ftp://example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&[("FIREBASE_DATABASE_URL", "https://shop.firebaseio.com")]).unwrap();
        assert_eq!(config.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
        assert_eq!(
            config.durable_storage_path(),
            PathBuf::from(DEFAULT_STATE_DIR).join(DURABLE_STORAGE_FILE)
        );
        assert!(config.firebase.auth_token.is_none());
        assert!(config.provinces_file.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_empty_optional_is_unset() {
        let config = load(&[
            ("FIREBASE_DATABASE_URL", "https://shop.firebaseio.com"),
            ("FIREBASE_AUTH_TOKEN", ""),
        ])
        .unwrap();
        assert!(config.firebase.auth_token.is_none());
    }

    #[test]
    fn test_auth_token_loaded() {
        let config = load(&[
            ("FIREBASE_DATABASE_URL", "https://shop.firebaseio.com"),
            ("FIREBASE_AUTH_TOKEN", "db-secret"),
        ])
        .unwrap();
        let token = config.firebase.auth_token.unwrap();
        assert_eq!(token.expose_secret(), "db-secret");
    }

    #[test]
    fn test_firebase_config_debug_redacts_token() {
        let config = FirebaseConfig {
            database_url: Url::parse("https://shop.firebaseio.com").unwrap(),
            auth_token: Some(SecretString::from("super_secret_db_token")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("shop.firebaseio.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_db_token"));
    }

    #[test]
    fn test_default_settings_with_provinces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provinces.json");
        fs::write(&path, r#"[{"name": "Punjab"}, {"name": "Sindh"}]"#).unwrap();

        let mut config =
            load(&[("FIREBASE_DATABASE_URL", "https://shop.firebaseio.com")]).unwrap();
        config.provinces_file = Some(path);

        let settings = config.default_settings().unwrap();
        let names: Vec<_> = settings
            .shipping_settings
            .provinces
            .iter()
            .filter_map(Province::name)
            .collect();
        assert_eq!(names, ["Punjab", "Sindh"]);
    }

    #[test]
    fn test_provinces_file_must_be_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provinces.json");
        fs::write(&path, r#"{"name": "Punjab"}"#).unwrap();

        let err = load_provinces(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProvincesFile(_, _)));
        assert!(err.to_string().contains("expected a JSON array"));
        assert!(load_provinces(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_provinces_error_names_the_file_not_a_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provinces.json");
        fs::write(&path, "not json").unwrap();

        let message = load_provinces(&path).unwrap_err().to_string();
        assert!(message.starts_with("Invalid provinces file"));
        assert!(message.contains(&path.display().to_string()));
        assert!(!message.contains("SETTINGS_PROVINCES_FILE"));
        assert!(!message.contains("environment variable"));
    }
}
