//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod assess;
mod industries;
mod validate;

pub use assess::{run_assess, AssessConfig};
pub use industries::run_industries;
pub use validate::run_validate;

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Process exit codes shared by all commands.
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Score below `--min-score`, or validation errors found
    pub const BELOW_THRESHOLD: i32 = 1;
    /// An error occurred; `main` exits with this for every failed command
    pub const ERROR: i32 = 3;
}

/// Where command output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Self::File(p),
            None => Self::Stdout,
        }
    }

    /// Check if output is to a terminal
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stdout) && std::io::stdout().is_terminal()
    }
}

/// Write `content` to the target.
pub fn write_output(content: &str, target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
            Ok(())
        }
    }
}

/// Whether ANSI colors should be used for output written to `target`.
fn use_color(no_color: bool, target: &OutputTarget) -> bool {
    !no_color && std::env::var_os("NO_COLOR").is_none() && target.is_terminal()
}
