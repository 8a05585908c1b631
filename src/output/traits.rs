//! Output writer trait and error types

use crate::output::Report;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for a finished report
pub trait ReportWriter {
    /// Writes every entry of `report`
    fn write_report(&self, report: &Report) -> OutputResult<()>;

    /// Human-readable name of the destination, for log lines
    fn destination(&self) -> String;
}
