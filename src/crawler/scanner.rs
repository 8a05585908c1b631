//! Content scanner: finds email addresses in a parsed page
//!
//! Regions are visited in a fixed order and each one only contributes
//! addresses not already found on the page:
//! 1. Text-editor widgets (`.elementor-widget-text-editor`)
//! 2. Paragraphs and headings (`p`, `h1`..`h6`)
//! 3. `mailto:` links
//!
//! Missing or empty elements simply contribute nothing; scanning never fails.

use crate::crawler::results::Finding;
use crate::email::{extract_emails, EmailAddress};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Class marking page-builder text widgets
pub const TEXT_EDITOR_CLASS: &str = "elementor-widget-text-editor";

/// Length of the context used when a widget has no paragraph
const CONTEXT_PREFIX_CHARS: usize = 100;

/// Label put in front of the visible text of a `mailto:` link
const MAILTO_CONTEXT_LABEL: &str = "Link mailto: ";

/// Scans a parsed page and returns one finding per distinct address
///
/// # Arguments
///
/// * `url` - The page URL, recorded as the source of every finding
/// * `document` - The parsed page
///
/// # Example
///
/// ```
/// use mailtrawl::crawler::scan_document;
/// use scraper::Html;
///
/// let document = Html::parse_document(
///     "<p>Contact us at test@example.com or support@domain.com</p>",
/// );
/// let findings = scan_document("https://example.com/", &document);
/// assert_eq!(findings.len(), 2);
/// assert_eq!(findings[0].context, "Contact us at test@example.com or support@domain.com");
/// ```
pub fn scan_document(url: &str, document: &Html) -> Vec<Finding> {
    let mut scan = PageScan::new(url);

    scan_text_editors(document, &mut scan);
    scan_text_blocks(document, &mut scan);
    scan_mailto_links(document, &mut scan);

    scan.findings
}

/// Findings of one page plus the addresses already seen on it
struct PageScan<'a> {
    url: &'a str,
    seen: HashSet<EmailAddress>,
    findings: Vec<Finding>,
}

impl<'a> PageScan<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            seen: HashSet::new(),
            findings: Vec::new(),
        }
    }

    fn is_new(&self, email: &EmailAddress) -> bool {
        !self.seen.contains(email)
    }

    fn record(&mut self, email: EmailAddress, context: String) {
        if self.seen.insert(email.clone()) {
            tracing::trace!("Found {} on {}", email, self.url);
            self.findings.push(Finding {
                email,
                context,
                source_url: self.url.to_string(),
            });
        }
    }
}

/// Region 1: text-editor widgets
///
/// Context is the text of the first paragraph inside the widget, or the first
/// 100 characters of the widget's own text when it has none.
fn scan_text_editors(document: &Html, scan: &mut PageScan<'_>) {
    let Ok(editor_selector) = Selector::parse(&format!(".{}", TEXT_EDITOR_CLASS)) else {
        return;
    };
    let paragraph_selector = Selector::parse("p").ok();

    for editor in document.select(&editor_selector) {
        let text = element_text(editor);
        if text.is_empty() {
            continue;
        }

        for email in extract_emails(&text) {
            if !scan.is_new(&email) {
                continue;
            }

            let context = paragraph_selector
                .as_ref()
                .and_then(|selector| editor.select(selector).next())
                .map(element_text)
                .filter(|paragraph| !paragraph.is_empty())
                .unwrap_or_else(|| text.chars().take(CONTEXT_PREFIX_CHARS).collect());

            scan.record(email, context);
        }
    }
}

/// Region 2: paragraphs and headings; context is the element's full text
fn scan_text_blocks(document: &Html, scan: &mut PageScan<'_>) {
    let Ok(block_selector) = Selector::parse("p, h1, h2, h3, h4, h5, h6") else {
        return;
    };

    for block in document.select(&block_selector) {
        let text = element_text(block);
        if text.is_empty() {
            continue;
        }

        for email in extract_emails(&text) {
            scan.record(email, text.clone());
        }
    }
}

/// Region 3: `mailto:` links
///
/// The address comes from the href itself (query stripped, one candidate per
/// comma-separated recipient), so it skips the free-text pattern and only
/// goes through the shape rules.
fn scan_mailto_links(document: &Html, scan: &mut PageScan<'_>) {
    let Ok(link_selector) = Selector::parse("a[href]") else {
        return;
    };

    for link in document.select(&link_selector) {
        let Some(recipients) = link.value().attr("href").and_then(mailto_recipients) else {
            continue;
        };

        let context = format!("{}{}", MAILTO_CONTEXT_LABEL, element_text(link));

        for candidate in recipients.split(',') {
            if let Some(email) = EmailAddress::parse(candidate) {
                scan.record(email, context.clone());
            }
        }
    }
}

/// Returns the recipient part of a `mailto:` href, without its query
fn mailto_recipients(href: &str) -> Option<&str> {
    let href = href.trim();
    let scheme = href.get(..7)?;
    if !scheme.eq_ignore_ascii_case("mailto:") {
        return None;
    }

    let rest = &href[7..];
    Some(rest.split('?').next().unwrap_or_default())
}

/// Visible text of an element
///
/// Text nodes are concatenated as they appear, so an address split over
/// inline tags (`jan<span>@</span>firma.pl`) stays whole. Whitespace runs
/// then collapse to a single space and the ends are trimmed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
