//! Source layout checks (SRC-001, SRC-002).

use super::{first_existing, join_display, path_exists, read_text};
use crate::layout::ProjectLayout;
use crate::{CheckError, CheckOutcome};

/// Run SRC-001: Component Structure
pub fn check_component_structure(layout: &ProjectLayout) -> Result<CheckOutcome, CheckError> {
    let components = layout.components_path();
    if !path_exists(&components)? {
        return Ok(CheckOutcome::fail_with(
            "Components directory not found",
            components.display().to_string(),
        ));
    }

    let mut problems = Vec::new();
    for component in &layout.required_components {
        let component_dir = components.join(component);
        if !path_exists(&component_dir)? {
            problems.push(format!("Component missing: {}", component));
        } else if first_existing(&component_dir, &layout.component_descriptors)?.is_none() {
            problems.push(format!("Component {} missing build configuration", component));
        }
    }

    match problems.len() {
        0 => Ok(CheckOutcome::pass("All required components present")),
        1 => Ok(CheckOutcome::fail(problems.remove(0))),
        n => Ok(CheckOutcome::fail_with(
            format!("{} of {} required components invalid", n, layout.required_components.len()),
            problems.join("; "),
        )),
    }
}

/// Run SRC-002: Main Application
pub fn check_main_application(layout: &ProjectLayout) -> Result<CheckOutcome, CheckError> {
    let main_dir = layout.main_path();
    if !path_exists(&main_dir)? {
        return Ok(CheckOutcome::fail_with(
            "Main directory not found",
            main_dir.display().to_string(),
        ));
    }

    let Some(main_file) = first_existing(&main_dir, &layout.main_sources)? else {
        return Ok(CheckOutcome::fail_with(
            "No main application file found",
            format!("looked for {}", join_display(&layout.main_sources)),
        ));
    };

    let content = read_text(&main_file)?;
    if !content.contains(&layout.entry_point) {
        return Ok(CheckOutcome::fail_with(
            format!("{} function not found", layout.entry_point),
            main_file.display().to_string(),
        ));
    }

    Ok(CheckOutcome::pass("Main application structure valid"))
}
