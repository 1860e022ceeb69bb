//! Command-line interface for doccov.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::detect::{Runner, ScanOptions};
use crate::error::ScanError;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Documentation coverage gate for Python sources.
///
/// Recursively scans a directory for `.py` files and reports every
/// function, async function, class and method whose body does not start
/// with a docstring. Exits non-zero when anything is missing, so it can be
/// used as a CI gate.
#[derive(Parser, Debug)]
#[command(name = "doccov")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Number of worker threads (default: one per logical CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Additional directory name to skip (repeatable)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    pub exclude_dirs: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log skipped files and scan progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            jobs: self.jobs,
            exclude_dirs: self.exclude_dirs.clone(),
        }
    }
}

/// Run a scan and write the report to stdout.
///
/// Returns the process exit code. An invalid root is reported on stderr and
/// yields [`EXIT_FAILED`] without any report output.
pub fn run_scan(args: &Cli) -> anyhow::Result<i32> {
    let runner = Runner::new(args.scan_options());
    let report = match runner.run(&args.path) {
        Ok(report) => report,
        Err(e @ ScanError::RootNotFound { .. }) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_FAILED);
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = io::stdout();
    let color = !args.no_color && stdout.is_terminal();
    let mut out = stdout.lock();

    match args.format {
        OutputFormat::Json => report::write_json(&mut out, &report)?,
        OutputFormat::Text => report::write_text(&mut out, &report, color)?,
    }
    out.flush()?;

    if report.passed {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}
