//! Check execution.
//!
//! Runs registered checks one at a time, in registry order.
//!
//! # Containment
//!
//! - Check returns a failure: recorded as a failed check
//! - Check returns an error: recorded as a failed check plus an error entry
//! - Check panics: caught via std::panic::catch_unwind, recorded as an error
//! - Unknown check ID in a selection: ignored with a warning
//!
//! Every selected check runs regardless of earlier outcomes. No function in
//! this module returns an error once checks are registered.

use crate::engine::result::RunResult;
use crate::layout::DEFAULT_PROJECT_ROOT;
use crate::{Check, CheckCategory, CheckError, CheckOutcome, CheckResult, PreflightError};
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Once;
use std::time::Instant;

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Recorded on the result; checks carry their own layout
    pub project_root: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            project_root: PathBuf::from(DEFAULT_PROJECT_ROOT),
        }
    }
}

/// Zero-argument check body
pub type CheckFn = Box<dyn Fn() -> Result<CheckOutcome, CheckError> + Send + Sync>;

/// A registered check with its execution function
pub struct RegisteredCheck {
    pub id: String,
    pub name: String,
    pub category: CheckCategory,
    pub description: String,
    pub check_fn: CheckFn,
}

/// Sequential check runner
pub struct CheckRunner {
    config: RunnerConfig,
    checks: Vec<RegisteredCheck>,
}

impl CheckRunner {
    /// Create a new runner with the given configuration
    pub fn new(config: RunnerConfig) -> Self {
        CheckRunner {
            config,
            checks: Vec::new(),
        }
    }

    /// Register checks for execution
    pub fn register_checks(&mut self, checks: Vec<RegisteredCheck>) -> Result<(), PreflightError> {
        for check in checks {
            self.register_check(check)?;
        }
        Ok(())
    }

    /// Register a single check. Names and IDs must be unique.
    pub fn register_check(&mut self, check: RegisteredCheck) -> Result<(), PreflightError> {
        if let Some(existing) = self
            .checks
            .iter()
            .find(|c| c.name == check.name || c.id == check.id)
        {
            let key = if existing.name == check.name {
                check.name
            } else {
                check.id
            };
            return Err(PreflightError::DuplicateCheck(key));
        }
        self.checks.push(check);
        Ok(())
    }

    /// Number of registered checks
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run all registered checks
    pub fn run_all(&self) -> RunResult {
        self.run_all_with(|_| {})
    }

    /// Run all registered checks, calling `on_complete` after each one
    pub fn run_all_with<F>(&self, on_complete: F) -> RunResult
    where
        F: FnMut(&Check),
    {
        let ids: Vec<String> = self.checks.iter().map(|c| c.id.clone()).collect();
        self.run_selected(&ids, on_complete)
    }

    /// Run specific checks by ID
    pub fn run_specific(&self, check_ids: &[String]) -> RunResult {
        self.run_selected(&self.select_specific(check_ids), |_| {})
    }

    /// Run all checks except specified IDs
    pub fn run_excluding(&self, skip_ids: &[String]) -> RunResult {
        self.run_selected(&self.select_excluding(skip_ids), |_| {})
    }

    /// IDs of the requested checks, in registry order
    pub fn select_specific(&self, check_ids: &[String]) -> Vec<String> {
        warn_unknown(&self.checks, check_ids);
        self.checks
            .iter()
            .filter(|c| check_ids.contains(&c.id))
            .map(|c| c.id.clone())
            .collect()
    }

    /// IDs of all checks except the skipped ones, in registry order
    pub fn select_excluding(&self, skip_ids: &[String]) -> Vec<String> {
        warn_unknown(&self.checks, skip_ids);
        self.checks
            .iter()
            .filter(|c| !skip_ids.contains(&c.id))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Execute the specified checks
    pub fn run_selected<F>(&self, check_ids: &[String], mut on_complete: F) -> RunResult
    where
        F: FnMut(&Check),
    {
        let start = Instant::now();
        let mut result = RunResult::new(self.config.project_root.clone());

        tracing::debug!(
            project_root = %self.config.project_root.display(),
            checks = check_ids.len(),
            "starting run"
        );

        for check in self.checks.iter().filter(|c| check_ids.contains(&c.id)) {
            self.run_one(check, &mut result);
            if let Some(done) = result.checks.last() {
                on_complete(done);
            }
        }

        result.total_duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            total = result.total,
            passed = result.passed,
            failed = result.failed,
            "run finished"
        );
        result
    }

    /// Run a single check and record it, returning whether it passed
    pub fn run_one(&self, check: &RegisteredCheck, result: &mut RunResult) -> bool {
        tracing::debug!(check = %check.name, id = %check.id, "running check");

        let outcome = safe_invoke(|| (check.check_fn)());

        match &outcome {
            CheckResult::Pass { .. } => {
                tracing::debug!(check = %check.name, "check passed");
            }
            CheckResult::Fail { message, .. } => {
                tracing::info!(check = %check.name, %message, "check failed");
            }
            CheckResult::Error { message, .. } => {
                tracing::warn!(check = %check.name, %message, "check raised an error");
            }
        }

        result.record(Check {
            id: check.id.clone(),
            name: check.name.clone(),
            category: check.category,
            description: check.description.clone(),
            result: outcome,
        })
    }
}

/// Invoke a check body, converting every way it can end into a [`CheckResult`].
pub fn safe_invoke<F>(check_fn: F) -> CheckResult
where
    F: FnOnce() -> Result<CheckOutcome, CheckError>,
{
    install_panic_hook();

    let start = Instant::now();
    CONTAINING.with(|c| c.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(check_fn));
    CONTAINING.with(|c| c.set(false));
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(CheckOutcome::Pass { message })) => CheckResult::Pass {
            message,
            duration_ms,
        },
        Ok(Ok(CheckOutcome::Fail { message, details })) => CheckResult::Fail {
            message,
            details,
            duration_ms,
        },
        Ok(Err(e)) => CheckResult::Error {
            message: e.to_string(),
            duration_ms,
        },
        Err(payload) => CheckResult::Error {
            message: CheckError::Panicked(panic_message(payload.as_ref())).to_string(),
            duration_ms,
        },
    }
}

/// Keep contained check panics out of the report stream.
///
/// The previous hook still handles panics outside of [`safe_invoke`] and on
/// other threads.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CONTAINING.with(Cell::get) {
                tracing::debug!(%info, "contained check panic");
            } else {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn warn_unknown(checks: &[RegisteredCheck], ids: &[String]) {
    for id in ids {
        if !checks.iter().any(|c| &c.id == id) {
            tracing::warn!(id = %id, "unknown check ID ignored");
        }
    }
}
