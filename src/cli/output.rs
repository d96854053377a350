//! Output formatting for fw-preflight.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! The terminal formatter can render a run incrementally: a header before
//! the first check, one block per check as it completes, and the summary
//! once the run is over. The JSON and JUnit formatters only render the
//! finished [`RunResult`].
//!
//! All formatters produce valid output for any `RunResult`, including one
//! with zero checks.

use crate::cli::args::OutputFormat;
use crate::engine::result::RunResult;
use crate::{Check, CheckCategory, CheckResult};
use chrono::{DateTime, SecondsFormat};
use std::path::Path;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a finished run into a string
    fn format(&self, result: &RunResult) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.colorize(text, "32")
    }

    fn red(&self, text: &str) -> String {
        self.colorize(text, "31")
    }

    fn magenta(&self, text: &str) -> String {
        self.colorize(text, "35")
    }

    /// Banner printed before the first check runs
    pub fn format_header(&self, project_root: &Path, timestamp: u64) -> String {
        let mut output = String::new();
        output.push_str(RULE);
        output.push('\n');
        output.push_str("fw-preflight firmware verification\n");
        output.push_str(&format!("Project: {}\n", project_root.display()));
        output.push_str(&format!("Timestamp: {}\n", format_timestamp(timestamp)));
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Diagnostic block for one completed check, or `None` when hidden by quiet mode
    pub fn format_check(&self, check: &Check) -> Option<String> {
        let timing = |duration_ms: u64| {
            if self.verbose {
                format!(" ({}ms)", duration_ms)
            } else {
                String::new()
            }
        };

        let (status, message, details) = match &check.result {
            CheckResult::Pass {
                message,
                duration_ms,
            } => {
                if self.quiet {
                    return None;
                }
                (self.green("[PASS]"), format!("{}{}", message, timing(*duration_ms)), None)
            }
            CheckResult::Fail {
                message,
                details,
                duration_ms,
            } => (
                self.red("[FAIL]"),
                format!("{}{}", message, timing(*duration_ms)),
                Some(details.as_str()).filter(|d| !d.is_empty()),
            ),
            CheckResult::Error {
                message,
                duration_ms,
            } => (
                self.magenta("[ERROR]"),
                format!("{}{}", message, timing(*duration_ms)),
                None,
            ),
        };

        let mut output = format!("  {} {} {}: {}\n", status, check.id, check.name, message);
        if let Some(details) = details {
            for item in details.split("; ") {
                output.push_str(&format!("         {}\n", item));
            }
        }
        Some(output)
    }

    /// Summary block printed after the run
    pub fn format_summary(&self, result: &RunResult) -> String {
        let mut output = String::new();
        output.push_str(RULE);
        output.push('\n');
        output.push_str("SUMMARY\n");
        output.push_str(&format!("  Total checks: {}\n", result.total));
        output.push_str(&format!("  Passed: {}\n", result.passed));
        output.push_str(&format!("  Failed: {}\n", result.failed));

        if !result.errors.is_empty() {
            output.push_str(&format!("  {}\n", self.magenta("Errors:")));
            for error in &result.errors {
                output.push_str(&format!("    - {}\n", error));
            }
        }

        match result.success_rate() {
            Some(rate) => output.push_str(&format!("  Success rate: {:.1}%\n", rate)),
            None => output.push_str("  Success rate: n/a (no checks ran)\n"),
        }
        if self.verbose {
            output.push_str(&format!(
                "  Total time: {:.3}s\n",
                result.total_duration_ms as f64 / 1000.0
            ));
        }

        let verdict = if result.is_success() {
            self.green("All checks passed. Firmware ready for deployment.")
        } else {
            self.red("Some checks failed. Fix the issues above before deployment.")
        };
        output.push_str(&format!("{}\n", verdict));
        output.push_str(&format!("Exit code: {}\n", result.exit_code()));
        output.push_str(RULE);

        output
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, result: &RunResult) -> String {
        let mut output = self.format_header(&result.project_root, result.timestamp);
        output.push('\n');
        for check in &result.checks {
            if let Some(block) = self.format_check(check) {
                output.push_str(&block);
            }
        }
        output.push('\n');
        output.push_str(&self.format_summary(result));
        output
    }
}

/// JSON formatter
#[cfg(feature = "json")]
pub struct JsonFormatter {
    pretty: bool,
}

#[cfg(feature = "json")]
#[derive(serde::Serialize)]
struct JsonReport<'a> {
    tool: &'static str,
    version: &'static str,
    project_root: &'a Path,
    timestamp: u64,
    total_duration_ms: u64,
    summary: crate::engine::result::ResultSummary,
    errors: &'a [String],
    checks: &'a [Check],
}

#[cfg(feature = "json")]
impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

#[cfg(feature = "json")]
impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &RunResult) -> String {
        let report = JsonReport {
            tool: "fw-preflight",
            version: env!("CARGO_PKG_VERSION"),
            project_root: &result.project_root,
            timestamp: result.timestamp,
            total_duration_ms: result.total_duration_ms,
            summary: result.summary(),
            errors: &result.errors,
            checks: &result.checks,
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        rendered.unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("failed to serialize report: {}", e) }).to_string()
        })
    }
}

/// JUnit XML formatter
#[cfg(feature = "junit")]
pub struct JunitFormatter;

#[cfg(feature = "junit")]
impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }
}

#[cfg(feature = "junit")]
impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "junit")]
impl OutputFormatter for JunitFormatter {
    fn format(&self, result: &RunResult) -> String {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let errored = result.errors.len();
        output.push_str(&format!(
            "<testsuites name=\"fw-preflight\" tests=\"{}\" failures=\"{}\" errors=\"{}\" time=\"{:.3}\">\n",
            result.total,
            result.failed as usize - errored,
            errored,
            result.total_duration_ms as f64 / 1000.0
        ));

        let categories = [
            (CheckCategory::Build, "build"),
            (CheckCategory::Config, "config"),
            (CheckCategory::Source, "source"),
        ];

        for (category, suite_name) in categories {
            let suite_checks = result.get_by_category(category);
            if suite_checks.is_empty() {
                continue;
            }

            let suite_errors = suite_checks.iter().filter(|c| c.result.is_error()).count();
            let suite_failures = suite_checks
                .iter()
                .filter(|c| matches!(c.result, CheckResult::Fail { .. }))
                .count();
            let suite_time: u64 = suite_checks.iter().map(|c| c.result.duration_ms()).sum();

            output.push_str(&format!(
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\" time=\"{:.3}\">\n",
                suite_name,
                suite_checks.len(),
                suite_failures,
                suite_errors,
                suite_time as f64 / 1000.0
            ));

            for check in suite_checks {
                output.push_str(&format!(
                    "    <testcase name=\"{}\" classname=\"fw-preflight.{}\" time=\"{:.3}\">\n",
                    Self::escape_xml(&check.name),
                    suite_name,
                    check.result.duration_ms() as f64 / 1000.0
                ));

                match &check.result {
                    CheckResult::Pass { message, .. } => {
                        output.push_str(&format!(
                            "      <system-out>{}</system-out>\n",
                            Self::escape_xml(message)
                        ));
                    }
                    CheckResult::Fail {
                        message, details, ..
                    } => {
                        output.push_str(&format!(
                            "      <failure message=\"{}\">{}</failure>\n",
                            Self::escape_xml(message),
                            Self::escape_xml(details)
                        ));
                    }
                    CheckResult::Error { message, .. } => {
                        output.push_str(&format!(
                            "      <error message=\"{}\" />\n",
                            Self::escape_xml(message)
                        ));
                    }
                }

                output.push_str("    </testcase>\n");
            }

            output.push_str("  </testsuite>\n");
        }

        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    no_color: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(!no_color, verbose, quiet)),
        #[cfg(feature = "json")]
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        #[cfg(feature = "junit")]
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}

/// Format a Unix timestamp as RFC 3339 in UTC
fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| timestamp.to_string())
}
