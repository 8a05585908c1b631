//! CSV report writer
//!
//! Files start with a UTF-8 byte order mark so spreadsheet tools detect the
//! encoding, followed by the `email,found_on,context` header row.

use crate::output::traits::{OutputResult, ReportWriter};
use crate::output::Report;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// UTF-8 byte order mark
pub const UTF8_BOM: &str = "\u{FEFF}";

/// Header row of the report
pub const CSV_HEADER: [&str; 3] = ["email", "found_on", "context"];

/// Writes `report` as CSV to `out`, one row per address
pub fn write_csv<W: Write>(report: &Report, mut out: W) -> OutputResult<()> {
    out.write_all(UTF8_BOM.as_bytes())?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for entry in report {
        writer.write_record([
            entry.email.as_str(),
            entry.found_on.as_str(),
            entry.context.as_str(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the report to a CSV file, replacing any existing file
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    path: PathBuf,
}

impl CsvReportWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_report(&self, report: &Report) -> OutputResult<()> {
        let file = File::create(&self.path)?;
        write_csv(report, BufWriter::new(file))
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}
