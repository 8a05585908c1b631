//! Plain-text report printed to the console
//!
//! Used when the CSV file cannot be written, so a crawl's findings are never
//! lost.

use crate::output::traits::{OutputResult, ReportWriter};
use crate::output::Report;
use std::io::{self, Write};

/// Writes every entry of `report` as a labelled block
pub fn write_console<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    writeln!(out, "Found {} unique email address(es):", report.len())?;
    for entry in report {
        writeln!(out, "Email: {}", entry.email)?;
        writeln!(out, "Found on: {}", entry.found_on)?;
        writeln!(out, "Context: {}", entry.context)?;
        writeln!(out, "{}", "-".repeat(50))?;
    }
    Ok(())
}

/// Prints the report to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReportWriter;

impl ReportWriter for ConsoleReportWriter {
    fn write_report(&self, report: &Report) -> OutputResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_console(report, &mut out)?;
        out.flush()?;
        Ok(())
    }

    fn destination(&self) -> String {
        "console".to_string()
    }
}
