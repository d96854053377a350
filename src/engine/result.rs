//! Result aggregation.
//!
//! A [`RunResult`] is owned by the runner for the duration of one run and
//! handed back by value. After every recorded check
//! `total == passed + failed` and `errors.len() <= failed`.

use crate::{Check, CheckCategory, CheckResult};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Summary statistics derived from a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub errored: u32,
    /// `None` when no checks ran
    pub success_rate: Option<f64>,
    pub success: bool,
}

/// Accumulated state of one harness run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub project_root: PathBuf,
    pub timestamp: u64,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    /// `"<check name>: <message>"` for every check that raised an error
    pub errors: Vec<String>,
    pub checks: Vec<Check>,
    pub total_duration_ms: u64,
}

impl RunResult {
    /// Create an empty result for a run against `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        RunResult {
            project_root: project_root.into(),
            timestamp: unix_timestamp(),
            total: 0,
            passed: 0,
            failed: 0,
            errors: Vec::new(),
            checks: Vec::new(),
            total_duration_ms: 0,
        }
    }

    /// Record a completed check, returning whether it passed.
    pub fn record(&mut self, check: Check) -> bool {
        self.total += 1;

        let passed = match &check.result {
            CheckResult::Pass { .. } => {
                self.passed += 1;
                true
            }
            CheckResult::Fail { .. } => {
                self.failed += 1;
                false
            }
            CheckResult::Error { message, .. } => {
                self.failed += 1;
                self.errors.push(format!("{}: {}", check.name, message));
                false
            }
        };

        self.checks.push(check);
        passed
    }

    /// Percentage of passed checks, rounded to one decimal place.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let rate = f64::from(self.passed) / f64::from(self.total) * 100.0;
        Some((rate * 10.0).round() / 10.0)
    }

    /// Overall verdict: every check ran and passed.
    ///
    /// A run with no checks is not a success.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.total > 0
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            total: self.total,
            passed: self.passed,
            failed: self.failed,
            errored: self.errors.len() as u32,
            success_rate: self.success_rate(),
            success: self.is_success(),
        }
    }

    /// Get checks by category
    pub fn get_by_category(&self, category: CheckCategory) -> Vec<&Check> {
        self.checks.iter().filter(|c| c.category == category).collect()
    }

    /// Get failed checks, including those that raised errors
    pub fn get_failures(&self) -> Vec<&Check> {
        self.checks.iter().filter(|c| !c.result.is_pass()).collect()
    }

    /// Look up a check result by name
    pub fn get(&self, name: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Seconds since the Unix epoch, or 0 if the clock is before it
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
