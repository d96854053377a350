//! fw-preflight library
//!
//! Post-build verification harness for ESP32 firmware projects.
//!
//! The harness inspects the output of a prior firmware build without ever
//! modifying it:
//! - Build artifacts (firmware binary presence and size)
//! - Generated configuration (`sdkconfig`) and partition tables
//! - Source tree layout (components, top-level CMake project, `app_main`)
//!
//! Every check runs independently; the run yields a single verdict and
//! exit code suitable for gating deployment.
//!
//! # Example
//!
//! ```no_run
//! use fw_preflight::{run_preflight, PreflightConfig};
//!
//! let config = PreflightConfig::default();
//! let result = run_preflight(config).expect("no checks selected");
//! println!("Checks passed: {}/{}", result.passed, result.total);
//! ```

pub mod checks;
pub mod cli;
pub mod engine;
pub mod layout;
pub mod version;

use cli::args::Args;
use engine::result::RunResult;
use engine::runner::{CheckRunner, RunnerConfig};
use layout::ProjectLayout;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Outcome of a single executed check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckResult {
    /// Check passed
    Pass { message: String, duration_ms: u64 },
    /// Check predicate returned false
    Fail {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Check raised an unexpected error while being evaluated
    Error { message: String, duration_ms: u64 },
}

impl CheckResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckResult::Pass { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CheckResult::Error { .. })
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            CheckResult::Pass { duration_ms, .. }
            | CheckResult::Fail { duration_ms, .. }
            | CheckResult::Error { duration_ms, .. } => *duration_ms,
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "PASS: {}", message),
            CheckResult::Fail { message, details, .. } if details.is_empty() => {
                write!(f, "FAIL: {}", message)
            }
            CheckResult::Fail { message, details, .. } => {
                write!(f, "FAIL: {} ({})", message, details)
            }
            CheckResult::Error { message, .. } => write!(f, "ERROR: {}", message),
        }
    }
}

/// What a check function reports when it completes without raising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass { message: String },
    Fail { message: String, details: String },
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        CheckOutcome::Pass {
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        CheckOutcome::Fail {
            message: message.into(),
            details: String::new(),
        }
    }

    pub fn fail_with(message: impl Into<String>, details: impl Into<String>) -> Self {
        CheckOutcome::Fail {
            message: message.into(),
            details: details.into(),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, CheckOutcome::Pass { .. })
    }
}

/// Unexpected conditions raised while evaluating a check.
///
/// These are recorded as errors, distinct from a check that simply fails.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid UTF-8", .path.display())]
    InvalidUtf8 { path: PathBuf },
    #[error("check panicked: {0}")]
    Panicked(String),
}

impl CheckError {
    /// Wrap an I/O error, classifying decoding failures separately.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::InvalidData {
            CheckError::InvalidUtf8 { path }
        } else {
            CheckError::Io { path, source }
        }
    }
}

/// Check category for grouping related checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    /// Build outputs and the top-level build descriptor
    Build,
    /// Generated configuration and partition tables
    Config,
    /// Source tree layout
    Source,
}

impl CheckCategory {
    /// Every category, in report order
    pub const ALL: [CheckCategory; 3] = [CheckCategory::Build, CheckCategory::Config, CheckCategory::Source];
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Build => write!(f, "Build"),
            CheckCategory::Config => write!(f, "Config"),
            CheckCategory::Source => write!(f, "Source"),
        }
    }
}

/// An executed check with its result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    /// Unique identifier (e.g., "BLD-001")
    pub id: String,
    /// Human-readable name, unique within a run
    pub name: String,
    pub category: CheckCategory,
    /// Description of what this check validates
    pub description: String,
    pub result: CheckResult,
}

/// Harness-level errors. Individual check problems never surface here.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("duplicate check registered: {0}")]
    DuplicateCheck(String),
    #[error("no checks selected to run")]
    NoChecksSelected,
    #[error("invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Configuration for a preflight run.
#[derive(Debug, Clone, Default)]
pub struct PreflightConfig {
    /// Where to look and what to look for
    pub layout: ProjectLayout,
    /// Specific checks to skip (by ID)
    pub skip_checks: Vec<String>,
    /// Specific checks to run (by ID)
    pub only_checks: Vec<String>,
}

impl PreflightConfig {
    /// Create configuration from command line arguments.
    ///
    /// A `--config` file is applied first; `--project-root` overrides it.
    pub fn from_args(args: &Args) -> Result<Self, PreflightError> {
        let mut layout = match &args.config {
            Some(path) => ProjectLayout::load(path)?,
            None => ProjectLayout::default(),
        };
        if let Some(root) = &args.project_root {
            layout.project_root = root.clone();
        }

        Ok(PreflightConfig {
            layout,
            skip_checks: args.skip.clone(),
            only_checks: args.only.clone(),
        })
    }
}

/// Run the preflight checks.
///
/// Returns the accumulated [`RunResult`], or [`PreflightError`] when the
/// registry is misconfigured or the selection leaves nothing to run.
pub fn run_preflight(config: PreflightConfig) -> Result<RunResult, PreflightError> {
    run_preflight_with(config, |_| {})
}

/// Run the preflight checks, invoking `on_complete` as each check finishes.
pub fn run_preflight_with<F>(config: PreflightConfig, on_complete: F) -> Result<RunResult, PreflightError>
where
    F: FnMut(&Check),
{
    let mut runner = CheckRunner::new(RunnerConfig {
        project_root: config.layout.project_root.clone(),
    });
    runner.register_checks(checks::create_all_checks(&config.layout))?;

    let selected = if !config.only_checks.is_empty() {
        runner.select_specific(&config.only_checks)
    } else {
        runner.select_excluding(&config.skip_checks)
    };

    if selected.is_empty() {
        return Err(PreflightError::NoChecksSelected);
    }

    Ok(runner.run_selected(&selected, on_complete))
}
