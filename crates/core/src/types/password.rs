//! Site-wide password gate.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Password gate configuration.
///
/// The password is stored and compared in plaintext. `Debug` is implemented
/// manually so it never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProtection {
    /// Whether visitors must enter the password before browsing.
    pub enabled: bool,
    /// The shared site password.
    pub password: String,
}

impl Default for PasswordProtection {
    fn default() -> Self {
        Self {
            enabled: false,
            password: "welcome".to_owned(),
        }
    }
}

impl PasswordProtection {
    /// A copy with the password replaced by a placeholder, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            enabled: self.enabled,
            password: "[REDACTED]".to_owned(),
        }
    }
}

impl fmt::Debug for PasswordProtection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordProtection")
            .field("enabled", &self.enabled)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
