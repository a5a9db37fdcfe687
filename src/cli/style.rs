//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escape codes when stdout
//! is not a terminal.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark used in success lines
pub const CHECK: &str = "✓";
/// Cross used in failure lines
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output
pub trait Stylize: Display + Sized {
    /// De-emphasized text
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Headings and labels
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Values worth noticing (counts, names)
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Success text
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Warning text
    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Yellow cross
pub fn cross() -> String {
    CROSS.warn()
}

/// Dimmed arrow for list items
pub fn arrow() -> String {
    "→".muted()
}
