//! Full run integration tests.
//!
//! Tests for complete verification runs: runner behavior, counter
//! invariants, and end-to-end scenarios against firmware trees.

use crate::mocks::FirmwareProject;
use fw_preflight::checks::create_all_checks;
use fw_preflight::engine::result::RunResult;
use fw_preflight::engine::runner::{CheckRunner, RegisteredCheck, RunnerConfig};
use fw_preflight::{
    run_preflight, run_preflight_with, CheckCategory, CheckError, CheckOutcome, CheckResult,
    PreflightConfig, PreflightError,
};
use std::io;

fn registered(
    id: &str,
    name: &str,
    check_fn: impl Fn() -> Result<CheckOutcome, CheckError> + Send + Sync + 'static,
) -> RegisteredCheck {
    RegisteredCheck {
        id: id.to_string(),
        name: name.to_string(),
        category: CheckCategory::Build,
        description: format!("Test check {}", id),
        check_fn: Box::new(check_fn),
    }
}

fn passing(id: &str, name: &str) -> RegisteredCheck {
    registered(id, name, || Ok(CheckOutcome::pass("ok")))
}

fn failing(id: &str, name: &str) -> RegisteredCheck {
    registered(id, name, || Ok(CheckOutcome::fail("nope")))
}

fn erroring(id: &str, name: &str) -> RegisteredCheck {
    registered(id, name, || {
        Err(CheckError::io(
            "sdkconfig",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        ))
    })
}

fn run_project(project: &FirmwareProject) -> RunResult {
    run_preflight(PreflightConfig {
        layout: project.layout(),
        ..Default::default()
    })
    .expect("checks selected")
}

fn assert_invariants(result: &RunResult) {
    assert_eq!(result.total, result.passed + result.failed);
    assert!(result.errors.len() <= result.failed as usize);
    assert_eq!(result.checks.len(), result.total as usize);
}

// Runner tests

#[test]
fn test_runner_runs_every_check() {
    let mut runner = CheckRunner::new(RunnerConfig::default());
    runner.register_check(passing("T-001", "First")).unwrap();
    runner.register_check(failing("T-002", "Second")).unwrap();
    runner.register_check(passing("T-003", "Third")).unwrap();

    let result = runner.run_all();
    assert_eq!(result.total, 3);
    assert_eq!(result.passed, 2);
    assert_eq!(result.failed, 1);
    assert!(result.errors.is_empty());
    assert_invariants(&result);
}

#[test]
fn test_runner_contains_errors_and_panics() {
    let mut runner = CheckRunner::new(RunnerConfig::default());
    runner.register_check(erroring("T-001", "Reads Config")).unwrap();
    runner
        .register_check(registered("T-002", "Panics", || panic!("index out of range")))
        .unwrap();
    runner.register_check(passing("T-003", "Still Runs")).unwrap();

    let result = runner.run_all();
    assert_eq!(result.total, 3);
    assert_eq!(result.passed, 1);
    assert_eq!(result.failed, 2);
    assert_eq!(
        result.errors,
        vec![
            "Reads Config: failed to read sdkconfig: Permission denied".to_string(),
            "Panics: check panicked: index out of range".to_string(),
        ]
    );
    assert!(result.get("Still Runs").unwrap().result.is_pass());
    assert_invariants(&result);
}

#[test]
fn test_plain_failure_is_not_an_error() {
    let mut runner = CheckRunner::new(RunnerConfig::default());
    runner.register_check(failing("T-001", "Fails")).unwrap();

    let result = runner.run_all();
    assert_eq!(result.failed, 1);
    assert!(result.errors.is_empty());
    assert!(matches!(
        result.checks[0].result,
        CheckResult::Fail { .. }
    ));
}

#[test]
fn test_run_one_reports_pass() {
    let runner = CheckRunner::new(RunnerConfig::default());
    let mut result = RunResult::new(".");

    assert!(runner.run_one(&passing("T-001", "Passes"), &mut result));
    assert!(!runner.run_one(&erroring("T-002", "Errors"), &mut result));
    assert_eq!(result.total, 2);
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn test_runner_preserves_registry_order() {
    let mut runner = CheckRunner::new(RunnerConfig::default());
    runner.register_check(passing("T-003", "C")).unwrap();
    runner.register_check(passing("T-001", "A")).unwrap();
    runner.register_check(passing("T-002", "B")).unwrap();

    let mut seen = Vec::new();
    runner.run_all_with(|check| seen.push(check.name.clone()));
    assert_eq!(seen, vec!["C", "A", "B"]);

    let result = runner.run_specific(&["T-002".to_string(), "T-003".to_string()]);
    let names: Vec<_> = result.checks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["C", "B"]);
}

#[test]
fn test_runner_run_excluding() {
    let mut runner = CheckRunner::new(RunnerConfig::default());
    runner.register_check(passing("T-001", "A")).unwrap();
    runner.register_check(passing("T-002", "B")).unwrap();
    runner.register_check(passing("T-003", "C")).unwrap();

    let result = runner.run_excluding(&["T-002".to_string(), "T-999".to_string()]);
    assert_eq!(result.total, 2);
    assert!(result.get("B").is_none());
}

#[test]
fn test_empty_runner() {
    let runner = CheckRunner::new(RunnerConfig::default());
    assert!(runner.is_empty());
    let result = runner.run_all();
    assert_eq!(result.total, 0);
    assert_eq!(result.success_rate(), None);
    assert_eq!(result.exit_code(), 1);
}

#[test]
fn test_registering_registry_twice_is_rejected() {
    let project = FirmwareProject::empty();
    let mut runner = CheckRunner::new(RunnerConfig::default());
    runner.register_checks(create_all_checks(&project.layout())).unwrap();
    let err = runner
        .register_checks(create_all_checks(&project.layout()))
        .unwrap_err();
    assert!(matches!(err, PreflightError::DuplicateCheck(ref name) if name == "Build Artifacts"));
    assert_eq!(runner.len(), 6);
}

// End-to-end scenarios

#[test]
fn test_valid_project_passes_everything() {
    let project = FirmwareProject::valid();
    let result = run_project(&project);

    assert_eq!(result.total, 6);
    assert_eq!(result.passed, 6);
    assert_eq!(result.failed, 0);
    assert_eq!(result.success_rate(), Some(100.0));
    assert!(result.is_success());
    assert_eq!(result.exit_code(), 0);
    assert_invariants(&result);
}

#[test]
fn test_missing_build_directory() {
    let project = FirmwareProject::valid();
    project.remove("build");
    let result = run_project(&project);

    match &result.get("Build Artifacts").unwrap().result {
        CheckResult::Fail { message, .. } => assert!(message.contains("directory not found")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(result.passed, 5);
    assert_eq!(result.success_rate(), Some(83.3));
    assert_eq!(result.exit_code(), 1);
    assert_invariants(&result);
}

#[test]
fn test_oversized_firmware() {
    let project = FirmwareProject::valid();
    project.firmware_size(2 * 1024 * 1024);
    let result = run_project(&project);

    match &result.get("Build Artifacts").unwrap().result {
        CheckResult::Fail { message, .. } => {
            assert!(message.contains("2097152"));
            assert!(message.contains("1048576"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(result.exit_code(), 1);
}

#[test]
fn test_unreadable_config_is_error_and_run_continues() {
    let project = FirmwareProject::valid();
    project.make_unreadable("sdkconfig");
    let result = run_project(&project);

    assert!(result.get("Configuration Files").unwrap().result.is_error());
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Configuration Files: failed to read"));
    assert_eq!(result.total, 6);
    assert_eq!(result.passed, 5);
    assert!(result.get("Main Application").unwrap().result.is_pass());
    assert_invariants(&result);
}

#[cfg(unix)]
#[test]
fn test_untraversable_root_is_error_not_missing() {
    let project = FirmwareProject::valid();
    project.set_root_mode(0o600);

    // Privileged users bypass permission bits; nothing to observe then
    if std::fs::metadata(project.join("sdkconfig")).is_ok() {
        project.set_root_mode(0o755);
        return;
    }

    let result = run_project(&project);
    project.set_root_mode(0o755);

    assert_eq!(result.total, 6);
    assert_eq!(result.passed, 0);
    assert_eq!(result.errors.len(), 6);
    assert!(result.checks.iter().all(|c| c.result.is_error()));
    assert!(result
        .errors
        .iter()
        .any(|e| e.starts_with("Configuration Files: failed to read")));
    assert_invariants(&result);
}

#[test]
fn test_empty_project_fails_every_check() {
    let project = FirmwareProject::empty();
    let result = run_project(&project);

    assert_eq!(result.total, 6);
    assert_eq!(result.failed, 6);
    assert!(result.errors.is_empty());
    assert_eq!(result.success_rate(), Some(0.0));
}

#[test]
fn test_reformatted_setting_is_reported_missing() {
    let project = FirmwareProject::valid();
    project.write(
        "sdkconfig",
        "CONFIG_ESP32_WIFI_CSI_ENABLED = y\nCONFIG_FREERTOS_UNICORE=n\n",
    );
    let result = run_project(&project);

    match &result.get("Configuration Files").unwrap().result {
        CheckResult::Fail { details, .. } => {
            assert!(details.contains("CONFIG_ESP32_WIFI_CSI_ENABLED=y"));
            assert!(!details.contains("CONFIG_FREERTOS_UNICORE=n"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_runs_are_idempotent() {
    let project = FirmwareProject::valid();
    project.remove("components/ota_updater/CMakeLists.txt");
    project.write("main/main.c", "int main(void) { return 0; }\n");

    let classify = |result: &RunResult| -> Vec<(String, bool, bool)> {
        result
            .checks
            .iter()
            .map(|c| (c.name.clone(), c.result.is_pass(), c.result.is_error()))
            .collect()
    };

    let first = run_project(&project);
    let second = run_project(&project);
    assert_eq!(classify(&first), classify(&second));
    assert_eq!(first.passed, 4);
}

#[test]
fn test_streaming_callback_sees_each_check() {
    let project = FirmwareProject::valid();
    let mut ids = Vec::new();
    let result = run_preflight_with(
        PreflightConfig {
            layout: project.layout(),
            ..Default::default()
        },
        |check| ids.push(check.id.clone()),
    )
    .unwrap();

    assert_eq!(
        ids,
        vec!["BLD-001", "CFG-001", "SRC-001", "CFG-002", "BLD-002", "SRC-002"]
    );
    assert_eq!(result.total, 6);
}

#[test]
fn test_only_and_skip_selection() {
    let project = FirmwareProject::empty();

    let only = run_preflight(PreflightConfig {
        layout: project.layout(),
        only_checks: vec!["BLD-002".to_string()],
        ..Default::default()
    })
    .unwrap();
    assert_eq!(only.total, 1);
    assert_eq!(only.checks[0].name, "Build System");

    let skipped = run_preflight(PreflightConfig {
        layout: project.layout(),
        skip_checks: vec!["BLD-001".to_string(), "SRC-002".to_string()],
        ..Default::default()
    })
    .unwrap();
    assert_eq!(skipped.total, 4);
}

#[test]
fn test_no_checks_selected_is_configuration_error() {
    let project = FirmwareProject::valid();
    let err = run_preflight(PreflightConfig {
        layout: project.layout(),
        only_checks: vec!["NOPE-001".to_string()],
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, PreflightError::NoChecksSelected));
}

#[test]
fn test_layout_override_changes_expectations() {
    let project = FirmwareProject::valid();
    project.firmware_size(2 * 1024 * 1024);

    let mut layout = project.layout();
    layout.max_firmware_size = 4 * 1024 * 1024;
    let result = run_preflight(PreflightConfig {
        layout,
        ..Default::default()
    })
    .unwrap();
    assert!(result.is_success());
}
