//! Configuration checks (CFG-001, CFG-002).
//!
//! Checks the generated sdkconfig and the partition table for required
//! entries. Both use literal substring matching, so an equivalent but
//! reformatted entry is reported as missing.

use super::{first_existing, join_display, missing_markers, path_exists, read_text};
use crate::layout::ProjectLayout;
use crate::{CheckError, CheckOutcome};

/// Run CFG-001: Configuration Files
pub fn check_configuration_files(layout: &ProjectLayout) -> Result<CheckOutcome, CheckError> {
    let sdkconfig = layout.resolve(&layout.config_file);
    if !path_exists(&sdkconfig)? {
        return Ok(CheckOutcome::fail(format!(
            "{} not found",
            layout.config_file.display()
        )));
    }

    let content = read_text(&sdkconfig)?;
    let missing = missing_markers(&content, &layout.required_settings);

    if !missing.is_empty() {
        return Ok(CheckOutcome::fail_with(
            format!("Missing {} critical configuration(s)", missing.len()),
            missing
                .iter()
                .map(|setting| format!("Missing critical configuration: {}", setting))
                .collect::<Vec<_>>()
                .join("; "),
        ));
    }

    Ok(CheckOutcome::pass("All critical configurations present"))
}

/// Run CFG-002: Memory Layout
pub fn check_memory_layout(layout: &ProjectLayout) -> Result<CheckOutcome, CheckError> {
    let Some(table) = first_existing(&layout.project_root, &layout.partition_tables)? else {
        return Ok(CheckOutcome::fail_with(
            "No partition table found",
            format!("looked for {}", join_display(&layout.partition_tables)),
        ));
    };

    let content = read_text(&table)?;
    let missing = missing_markers(&content, &layout.required_partitions);
    let file_name = table
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !missing.is_empty() {
        return Ok(CheckOutcome::fail_with(
            format!("Missing partition: {}", missing.join(", ")),
            format!("in {}", file_name),
        ));
    }

    Ok(CheckOutcome::pass(format!("Partition table valid ({})", file_name)))
}
