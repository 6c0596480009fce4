//! User-facing notifications for mutation outcomes.

use std::fmt;

/// Outcome message shown to the person who triggered a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    /// The message text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Failure(message) => message,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Delivers [`Notice`]s to the user.
///
/// Called synchronously from inside store operations, so implementations
/// must not block for long.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default notifier: writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Success(message) => tracing::info!(notice = %message, "Settings notice"),
            Notice::Failure(message) => tracing::warn!(notice = %message, "Settings notice"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_message() {
        let notice = Notice::Failure("Failed to update password".to_string());
        assert!(notice.is_failure());
        assert_eq!(notice.to_string(), "Failed to update password");
        assert!(!Notice::Success(String::new()).is_failure());
    }
}
