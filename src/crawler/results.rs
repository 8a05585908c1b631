//! Per-page findings collected during a crawl

use crate::email::EmailAddress;
use serde::Serialize;

/// One email address observed on one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The address itself
    pub email: EmailAddress,

    /// Text surrounding the address (informational only)
    pub context: String,

    /// The page the address was found on
    pub source_url: String,
}

/// All findings of a single page, in scan order, one per distinct address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFindings {
    pub url: String,
    pub findings: Vec<Finding>,
}

/// Findings of a whole crawl, keyed by page URL in visiting order
///
/// Pages without findings are not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlResults {
    pages: Vec<PageFindings>,
}

impl CrawlResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the findings of `url`
    ///
    /// Empty finding lists are ignored. Recording the same URL twice replaces
    /// the earlier entry in place.
    pub fn record(&mut self, url: impl Into<String>, findings: Vec<Finding>) {
        if findings.is_empty() {
            return;
        }

        let url = url.into();
        match self.pages.iter_mut().find(|page| page.url == url) {
            Some(page) => page.findings = findings,
            None => self.pages.push(PageFindings { url, findings }),
        }
    }

    /// Findings of `url`, if any were recorded
    pub fn get(&self, url: &str) -> Option<&[Finding]> {
        self.pages
            .iter()
            .find(|page| page.url == url)
            .map(|page| page.findings.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageFindings> {
        self.pages.iter()
    }

    /// Number of pages with at least one finding
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of findings across all pages (duplicates across pages counted)
    pub fn total_findings(&self) -> usize {
        self.pages.iter().map(|page| page.findings.len()).sum()
    }
}

impl<'a> IntoIterator for &'a CrawlResults {
    type Item = &'a PageFindings;
    type IntoIter = std::slice::Iter<'a, PageFindings>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
