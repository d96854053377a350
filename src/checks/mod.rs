//! Firmware verification checks.
//!
//! Checks are organized by category:
//! - Build: firmware binary and top-level CMake project
//! - Config: generated sdkconfig and partition tables
//! - Source: component and main application layout
//!
//! # Read-only contract
//!
//! Every check is a pure read against the project root:
//! - Expected artifact missing or incomplete: `Ok(CheckOutcome::Fail)` with a reason
//! - Unexpected I/O or decoding problem: `Err(CheckError)`, recorded as an error
//!
//! Checks never write, never spawn processes and never depend on each
//! other's outcome, so their order only affects report readability.

pub mod build;
pub mod config;
pub mod source;

use crate::engine::runner::RegisteredCheck;
use crate::layout::ProjectLayout;
use crate::{CheckCategory, CheckError, CheckOutcome};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type CheckFn = fn(&ProjectLayout) -> Result<CheckOutcome, CheckError>;

/// Static description of a registered check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub category: CheckCategory,
    pub description: &'static str,
}

/// The registry, in report order.
const CHECKS: &[(CheckInfo, CheckFn)] = &[
    (
        CheckInfo {
            id: "BLD-001",
            name: "Build Artifacts",
            category: CheckCategory::Build,
            description: "Firmware binary exists and fits the flash size limit",
        },
        build::check_build_artifacts,
    ),
    (
        CheckInfo {
            id: "CFG-001",
            name: "Configuration Files",
            category: CheckCategory::Config,
            description: "sdkconfig contains every critical setting",
        },
        config::check_configuration_files,
    ),
    (
        CheckInfo {
            id: "SRC-001",
            name: "Component Structure",
            category: CheckCategory::Source,
            description: "Required components exist with a build descriptor",
        },
        source::check_component_structure,
    ),
    (
        CheckInfo {
            id: "CFG-002",
            name: "Memory Layout",
            category: CheckCategory::Config,
            description: "Partition table declares the required partitions",
        },
        config::check_memory_layout,
    ),
    (
        CheckInfo {
            id: "BLD-002",
            name: "Build System",
            category: CheckCategory::Build,
            description: "Top-level CMakeLists.txt declares a project",
        },
        build::check_build_system,
    ),
    (
        CheckInfo {
            id: "SRC-002",
            name: "Main Application",
            category: CheckCategory::Source,
            description: "Main source file defines the app_main entry point",
        },
        source::check_main_application,
    ),
];

/// Get descriptions of all registered checks, in run order
pub fn get_all_checks() -> Vec<CheckInfo> {
    CHECKS.iter().map(|(info, _)| *info).collect()
}

/// Get descriptions of checks in a specific category
pub fn get_checks_by_category(category: CheckCategory) -> Vec<CheckInfo> {
    CHECKS
        .iter()
        .filter(|(info, _)| info.category == category)
        .map(|(info, _)| *info)
        .collect()
}

/// Create all registered checks bound to `layout`.
pub fn create_all_checks(layout: &ProjectLayout) -> Vec<RegisteredCheck> {
    let layout = Arc::new(layout.clone());

    CHECKS
        .iter()
        .map(|(info, check_fn)| {
            let layout = Arc::clone(&layout);
            let check_fn = *check_fn;
            RegisteredCheck {
                id: info.id.to_string(),
                name: info.name.to_string(),
                category: info.category,
                description: info.description.to_string(),
                check_fn: Box::new(move || check_fn(&layout)),
            }
        })
        .collect()
}

/// Read a text file, mapping failures to [`CheckError`].
pub(crate) fn read_text(path: &Path) -> Result<String, CheckError> {
    fs::read_to_string(path).map_err(|e| CheckError::io(path, e))
}

/// Whether `path` exists.
///
/// Only a missing entry (or a missing parent directory) counts as absent.
/// Any other stat failure, such as a root without search permission, is an
/// error rather than a "not found" failure.
pub(crate) fn path_exists(path: &Path) -> Result<bool, CheckError> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(CheckError::io(path, e)),
    }
}

/// First candidate under `dir` that exists.
pub(crate) fn first_existing<P: AsRef<Path>>(
    dir: &Path,
    candidates: &[P],
) -> Result<Option<PathBuf>, CheckError> {
    for candidate in candidates {
        let path = dir.join(candidate);
        if path_exists(&path)? {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Markers that do not occur verbatim in `content`.
///
/// Matching is a literal substring search; no parsing of the file format.
pub(crate) fn missing_markers<'a>(content: &str, markers: &'a [String]) -> Vec<&'a str> {
    markers
        .iter()
        .map(String::as_str)
        .filter(|marker| !content.contains(marker))
        .collect()
}

/// Render a list of candidate names for diagnostics.
pub(crate) fn join_display<P: AsRef<Path>>(items: &[P]) -> String {
    items
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
