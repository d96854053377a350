//! Build metadata for the `version` command.

use crate::layout::{DEFAULT_PROJECT_ROOT, MAX_FIRMWARE_SIZE};
use std::fmt;

/// What this binary was built from and what it can emit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: &'static str,
    pub rustc_version: Option<&'static str>,
    /// Report formats compiled in, text first
    pub formats: Vec<&'static str>,
}

impl BuildInfo {
    /// `0.1.0 (abc1234 2025-01-01T00:00:00Z)`, omitting unknown parts
    pub fn short_version(&self) -> String {
        let build: Vec<&str> = [self.commit, self.build_date].into_iter().flatten().collect();
        if build.is_empty() {
            self.version.to_string()
        } else {
            format!("{} ({})", self.version, build.join(" "))
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fw-preflight {}", self.short_version())?;
        match self.rustc_version {
            Some(rustc) => writeln!(f, "target {} (rustc {})", self.target, rustc)?,
            None => writeln!(f, "target {}", self.target)?,
        }
        writeln!(f, "formats: {}", self.formats.join(", "))?;
        write!(
            f,
            "defaults: project root {}, firmware limit {} bytes",
            DEFAULT_PROJECT_ROOT, MAX_FIRMWARE_SIZE
        )
    }
}

/// Report formats enabled by cargo features
fn enabled_formats() -> Vec<&'static str> {
    let mut formats = vec!["text"];
    if cfg!(feature = "json") {
        formats.push("json");
    }
    if cfg!(feature = "junit") {
        formats.push("junit");
    }
    formats
}

pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("FW_PREFLIGHT_GIT_HASH"),
        build_date: option_env!("FW_PREFLIGHT_BUILD_DATE"),
        target: env!("FW_PREFLIGHT_TARGET"),
        rustc_version: option_env!("FW_PREFLIGHT_RUSTC_VERSION"),
        formats: enabled_formats(),
    }
}
