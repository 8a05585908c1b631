//! Result aggregation: one representative finding per email address

use crate::crawler::{CrawlResults, Finding};
use crate::email::EmailAddress;
use serde::Serialize;
use std::collections::HashMap;

/// The representative occurrence of one email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub email: EmailAddress,

    /// Page the address was first found on
    pub found_on: String,

    /// Context of that first occurrence
    pub context: String,
}

impl From<&Finding> for ReportEntry {
    fn from(finding: &Finding) -> Self {
        Self {
            email: finding.email.clone(),
            found_on: finding.source_url.clone(),
            context: finding.context.clone(),
        }
    }
}

/// Email addresses of a crawl, de-duplicated, in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<ReportEntry>,
    index: HashMap<EmailAddress, usize>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `finding` unless its address is already in the report
    ///
    /// Returns true if the finding became the representative of its address.
    pub fn insert(&mut self, finding: &Finding) -> bool {
        if self.index.contains_key(&finding.email) {
            return false;
        }
        self.index.insert(finding.email.clone(), self.entries.len());
        self.entries.push(ReportEntry::from(finding));
        true
    }

    /// The representative of `email` (compared case-insensitively)
    pub fn get(&self, email: &str) -> Option<&ReportEntry> {
        let email = EmailAddress::parse(email)?;
        self.index.get(&email).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter()
    }

    /// Number of unique addresses
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a ReportEntry;
    type IntoIter = std::slice::Iter<'a, ReportEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Merges per-page findings into a report de-duplicated by address
///
/// Pages are taken in visiting order and findings in scan order; the first
/// occurrence of an address wins and later ones are ignored.
///
/// # Example
///
/// ```
/// use mailtrawl::{aggregate, CrawlResults, EmailAddress, Finding};
///
/// let finding = |url: &str| Finding {
///     email: EmailAddress::parse("info@example.com").unwrap(),
///     context: format!("seen on {}", url),
///     source_url: url.to_string(),
/// };
///
/// let mut results = CrawlResults::new();
/// results.record("https://example.com/a", vec![finding("https://example.com/a")]);
/// results.record("https://example.com/b", vec![finding("https://example.com/b")]);
///
/// let report = aggregate(&results);
/// assert_eq!(report.len(), 1);
/// assert_eq!(report.get("info@example.com").unwrap().found_on, "https://example.com/a");
/// ```
pub fn aggregate(results: &CrawlResults) -> Report {
    let mut report = Report::new();
    for page in results {
        for finding in &page.findings {
            report.insert(finding);
        }
    }
    report
}
