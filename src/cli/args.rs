//! Command line arguments for fw-preflight.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Post-build verification harness for ESP32 firmware projects
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "fw-preflight")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXIT CODES:\n    0   All checks passed\n    1   One or more checks failed or errored")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Firmware project root (default: ..)
    #[arg(long, value_name = "DIR", global = true)]
    pub project_root: Option<PathBuf>,

    /// Load layout overrides from a TOML file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Run only this check ID (repeatable)
    #[arg(long, value_name = "ID", global = true)]
    pub only: Vec<String>,

    /// Skip this check ID (repeatable)
    #[arg(long, value_name = "ID", global = true)]
    pub skip: Vec<String>,

    /// Only output failures and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Include failure details for every check and timings
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Args {
    /// The command to execute; running checks is the default.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }
}

/// Command to execute
#[derive(Subcommand, Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// Run verification checks (default)
    #[default]
    Check,
    /// List all available checks
    List,
    /// Print version and build information
    Version,
}

/// Output format selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    #[cfg(feature = "json")]
    Json,
    /// JUnit XML for CI/CD integration
    #[cfg(feature = "junit")]
    Junit,
}
