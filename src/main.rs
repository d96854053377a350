//! fw-preflight CLI entry point
//!
//! Post-build verification for ESP32 firmware projects.

use clap::Parser;
use fw_preflight::checks::get_checks_by_category;
use fw_preflight::cli::args::{Args, Command, OutputFormat};
use fw_preflight::cli::output::{get_formatter, TerminalFormatter};
use fw_preflight::engine::result::{unix_timestamp, RunResult};
use fw_preflight::version::get_build_info;
use fw_preflight::{run_preflight, run_preflight_with, CheckCategory, PreflightConfig, PreflightError};

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays a clean report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    let args = Args::parse();
    let mut out = io::stdout().lock();

    let outcome = match args.command() {
        Command::Version => writeln!(out, "{}", get_build_info())
            .map(|_| 0)
            .map_err(PreflightError::from),
        Command::List => print_check_list(&mut out).map(|_| 0).map_err(PreflightError::from),
        Command::Check => execute(&args, &mut out).map(|result| result.exit_code()),
    };

    match outcome.and_then(|code| out.flush().map(|_| code).map_err(PreflightError::from)) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            // stderr may be gone as well; the exit code still reports it
            let _ = writeln!(io::stderr(), "Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_check_list(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Available checks:")?;
    for category in CheckCategory::ALL {
        writeln!(out)?;
        writeln!(out, "{}:", category)?;
        for check in get_checks_by_category(category) {
            writeln!(out, "  {:<8} {:<20} {}", check.id, check.name, check.description)?;
        }
    }
    Ok(())
}

fn execute(args: &Args, out: &mut impl Write) -> Result<RunResult, PreflightError> {
    let config = PreflightConfig::from_args(args)?;

    if args.format != OutputFormat::Text {
        let result = run_preflight(config)?;
        let formatter = get_formatter(args.format, args.no_color, args.verbose, args.quiet);
        writeln!(out, "{}", formatter.format(&result))?;
        return Ok(result);
    }

    // Text output streams each check's diagnostics as it completes
    let terminal = TerminalFormatter::new(!args.no_color, args.verbose, args.quiet);
    write!(
        out,
        "{}",
        terminal.format_header(&config.layout.project_root, unix_timestamp())
    )?;
    writeln!(out)?;

    // Checks keep running after a failed write; the first error is reported
    let mut write_error = None;
    let result = run_preflight_with(config, |check| {
        if write_error.is_some() {
            return;
        }
        if let Some(block) = terminal.format_check(check) {
            if let Err(e) = write!(out, "{}", block).and_then(|_| out.flush()) {
                write_error = Some(e);
            }
        }
    })?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    writeln!(out)?;
    writeln!(out, "{}", terminal.format_summary(&result))?;
    Ok(result)
}
