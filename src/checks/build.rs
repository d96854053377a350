//! Build output checks (BLD-001, BLD-002).
//!
//! Verifies the firmware image produced by the last build and the
//! top-level CMake project declaration.

use super::{path_exists, read_text};
use crate::layout::ProjectLayout;
use crate::{CheckError, CheckOutcome};
use std::fs;

/// Run BLD-001: Build Artifacts
pub fn check_build_artifacts(layout: &ProjectLayout) -> Result<CheckOutcome, CheckError> {
    let build_dir = layout.build_path();
    if !path_exists(&build_dir)? {
        return Ok(CheckOutcome::fail_with(
            "Build directory not found",
            build_dir.display().to_string(),
        ));
    }

    let firmware = layout.firmware_path();
    if !path_exists(&firmware)? {
        return Ok(CheckOutcome::fail_with(
            "Main firmware binary not found",
            firmware.display().to_string(),
        ));
    }

    let size = fs::metadata(&firmware)
        .map_err(|e| CheckError::io(&firmware, e))?
        .len();
    let max_size = layout.max_firmware_size;
    tracing::debug!(path = %firmware.display(), size, max_size, "firmware image");

    if size > max_size {
        return Ok(CheckOutcome::fail_with(
            format!("Firmware too large: {} > {} bytes", size, max_size),
            format!(
                "{} is {} bytes over the {} byte limit",
                layout.firmware_binary,
                size - max_size,
                max_size
            ),
        ));
    }

    Ok(CheckOutcome::pass(format!("Firmware size OK: {} bytes", size)))
}

/// Run BLD-002: Build System
pub fn check_build_system(layout: &ProjectLayout) -> Result<CheckOutcome, CheckError> {
    let descriptor = layout.resolve(&layout.build_descriptor);
    let name = layout.build_descriptor.display();

    if !path_exists(&descriptor)? {
        return Ok(CheckOutcome::fail(format!("{} not found", name)));
    }

    let content = read_text(&descriptor)?;
    if !content.contains(&layout.project_marker) {
        return Ok(CheckOutcome::fail_with(
            format!("No project definition in {}", name),
            format!("marker `{}` not found", layout.project_marker),
        ));
    }

    Ok(CheckOutcome::pass("Build system configured"))
}
