//! Terminal output.

use storefront_settings::{Notice, Notifier};

/// Prints notices for the operator: successes to stdout, failures to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    #[allow(clippy::print_stdout, clippy::print_stderr)]
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(message) => println!("✓ {message}"),
            Notice::Failure(message) => eprintln!("✗ {message}"),
        }
    }
}

/// Print a line of command output.
#[allow(clippy::print_stdout)]
pub fn line(text: &str) {
    println!("{text}");
}
