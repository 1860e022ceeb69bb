//! Output formatting for scan reports.
//!
//! Supports two output formats:
//! - Text: the line-oriented report, optionally colored for terminals
//! - JSON: structured output for programmatic consumption

use std::io::Write;

use colored::{ColoredString, Colorize};

use crate::detect::ScanReport;

// =============================================================================
// JSON Format
// =============================================================================

/// Write the report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &ScanReport) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// Text Format
// =============================================================================

/// Write the report in the line-oriented text format.
///
/// With `color` off the output is plain bytes, identical across runs on an
/// unchanged tree.
pub fn write_text<W: Write>(out: &mut W, report: &ScanReport, color: bool) -> anyhow::Result<()> {
    let paint = |text: String, style: fn(&str) -> ColoredString| {
        if color {
            style(&text).to_string()
        } else {
            text
        }
    };

    writeln!(out, "Scanning directory: {}", report.root.display())?;
    writeln!(out)?;

    for file in &report.files {
        writeln!(
            out,
            "{}",
            paint(format!("{}:", file.path.display()), |s| s.blue().bold())
        )?;
        for decl in &file.missing {
            writeln!(
                out,
                "  - {}: {} '{}' is missing a documentation block.",
                paint(format!("Line {}", decl.line), |s| s.dimmed()),
                decl.kind,
                decl.qualified_name
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", paint("--- Summary ---".to_string(), |s| s.bold()))?;
    let count = report.total_missing.to_string();
    writeln!(
        out,
        "Total missing documentation items found: {}",
        if report.total_missing > 0 {
            paint(count, |s| s.red())
        } else {
            paint(count, |s| s.green())
        }
    )?;

    if report.passed {
        writeln!(
            out,
            "{}",
            paint("No missing documentation blocks found!".to_string(), |s| s.green())
        )?;
    }

    Ok(())
}
