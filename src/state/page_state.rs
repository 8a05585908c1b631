/// Page state definitions for tracking crawl progress
use std::fmt;

/// Final state of a visited page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Page was fetched, scanned and its links enqueued
    Processed,

    /// Page could not be fetched; it contributed no findings and no links
    FetchFailed,
}

impl PageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
