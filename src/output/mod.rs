//! Output module for aggregating and saving crawl results
//!
//! This module handles:
//! - Merging per-page findings into a report de-duplicated by address
//! - Writing the report as CSV, with a console fallback
//! - Crawl statistics

mod console_output;
mod csv_output;
mod report;
pub mod stats;
mod traits;

pub use console_output::{write_console, ConsoleReportWriter};
pub use csv_output::{write_csv, CsvReportWriter, CSV_HEADER, UTF8_BOM};
pub use report::{aggregate, Report, ReportEntry};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ReportWriter};

use std::path::Path;

/// What happened to a report handed to [`save_report`]
#[derive(Debug)]
pub enum SaveOutcome {
    /// The report had no entries; nothing was written
    Empty,

    /// The report was written to the CSV file
    Saved { count: usize },

    /// The CSV file could not be written; the report went to the console
    ConsoleFallback(OutputError),
}

/// Saves `report` to the CSV file at `path`
///
/// On success prints how many addresses were saved, followed by the
/// addresses. If the file cannot be written the error is logged and the
/// whole report is printed to the console instead. An empty report only
/// logs a warning.
pub fn save_report(report: &Report, path: &Path) -> SaveOutcome {
    save_report_with(report, &CsvReportWriter::new(path), &ConsoleReportWriter)
}

/// [`save_report`] with explicit primary and fallback writers
pub fn save_report_with(
    report: &Report,
    primary: &dyn ReportWriter,
    fallback: &dyn ReportWriter,
) -> SaveOutcome {
    if report.is_empty() {
        tracing::warn!("No email addresses found, nothing to save");
        return SaveOutcome::Empty;
    }

    match primary.write_report(report) {
        Ok(()) => {
            tracing::info!(
                "Saved {} unique email addresses to {}",
                report.len(),
                primary.destination()
            );
            println!(
                "Saved {} unique email addresses to {}",
                report.len(),
                primary.destination()
            );
            for entry in report {
                println!("  - {}", entry.email);
            }
            SaveOutcome::Saved {
                count: report.len(),
            }
        }
        Err(e) => {
            tracing::error!("Failed to save report to {}: {}", primary.destination(), e);
            eprintln!("Error saving to {}: {}", primary.destination(), e);

            if let Err(fallback_err) = fallback.write_report(report) {
                tracing::error!(
                    "Failed to write report to {}: {}",
                    fallback.destination(),
                    fallback_err
                );
            }
            SaveOutcome::ConsoleFallback(e)
        }
    }
}
