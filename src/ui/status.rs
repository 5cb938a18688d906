// Wed Jan 15 2026 - Alex

use colored::Colorize;
use std::fmt::Display;

/// Status lines for the user. They go to stderr so stdout stays clean for
/// symbol output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Status {
    quiet: bool,
}

impl Status {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn banner(&self) {
        if self.quiet {
            return;
        }
        eprintln!("{}", format!("sigmatch {}", env!("CARGO_PKG_VERSION")).cyan().bold());
        eprintln!("{}", "=".repeat(50).cyan());
    }

    pub fn info(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{} {}", "[*]".blue(), message);
        }
    }

    pub fn success(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{} {}", "[+]".green(), message);
        }
    }

    pub fn warning(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{} {}", "[!]".yellow(), message);
        }
    }

    pub fn error(&self, message: impl Display) {
        eprintln!("{} {}", "[-]".red(), message);
    }
}
