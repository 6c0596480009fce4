//! Admin credential check.
//!
//! The admin panel is unlocked by a single fixed email/password pair. This
//! only decides whether admin controls are shown; it does not protect data.

/// A fixed admin login.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AdminCredentials {
    email: &'static str,
    password: &'static str,
}

/// The storefront's admin login.
pub const ADMIN_CREDENTIALS: AdminCredentials = AdminCredentials {
    email: "admin@example.com",
    password: "admin123",
};

impl AdminCredentials {
    /// The login email.
    #[must_use]
    pub const fn email(&self) -> &'static str {
        self.email
    }

    /// Whether the submitted pair matches exactly.
    ///
    /// No normalization is applied: case and surrounding whitespace matter.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        email == self.email && password == self.password
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_exact_pair() {
        assert!(ADMIN_CREDENTIALS.matches("admin@example.com", "admin123"));
    }

    #[test]
    fn test_rejects_everything_else() {
        assert!(!ADMIN_CREDENTIALS.matches("x", "y"));
        assert!(!ADMIN_CREDENTIALS.matches("admin@example.com", ""));
        assert!(!ADMIN_CREDENTIALS.matches("Admin@example.com", "admin123"));
        assert!(!ADMIN_CREDENTIALS.matches("admin@example.com ", "admin123"));
    }

    #[test]
    fn test_debug_hides_password() {
        assert!(!format!("{ADMIN_CREDENTIALS:?}").contains("admin123"));
    }
}
