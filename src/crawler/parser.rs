//! HTML parser for extracting findings and same-site links
//!
//! A fetched page is parsed exactly once; the content scanner and the link
//! extractor both read the same document.

use crate::crawler::results::Finding;
use crate::crawler::scanner::scan_document;
use crate::url::SiteScope;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Everything the crawler needs from one page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Email findings, one per distinct address
    pub findings: Vec<Finding>,

    /// Same-site links (absolute URLs, de-duplicated, in document order)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts findings and same-site links
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The page URL; source of findings and base for relative links
/// * `scope` - The site being crawled
///
/// # Example
///
/// ```
/// use mailtrawl::crawler::parse_page;
/// use mailtrawl::url::SiteScope;
/// use url::Url;
///
/// let html = r#"<html><body>
///     <p>Write to office@example.com</p>
///     <a href="/team">Team</a>
///     <a href="https://elsewhere.org/">Partner</a>
/// </body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let scope = SiteScope::from_seed(&page_url).unwrap();
///
/// let parsed = parse_page(html, &page_url, &scope);
/// assert_eq!(parsed.findings.len(), 1);
/// assert_eq!(parsed.links, vec!["https://example.com/team".to_string()]);
/// ```
pub fn parse_page(html: &str, page_url: &Url, scope: &SiteScope) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        findings: scan_document(page_url.as_str(), &document),
        links: extract_links(&document, page_url, scope),
    }
}

/// Extracts the links of `document` that belong to the crawled site
///
/// Every `<a href>` is resolved against `page_url` with standard relative
/// resolution (relative paths, `//host/...`, `?query`, `#fragment`). A result
/// is kept only when [`SiteScope::contains`] accepts it. URLs are not
/// normalized, so `/a` and `/a#top` are two different links.
pub fn extract_links(document: &Html, page_url: &Url, scope: &SiteScope) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute_url) = resolve_link(href, page_url) else {
            continue;
        };

        if !scope.contains(&absolute_url) {
            tracing::trace!("Skipping off-site link: {}", absolute_url);
            continue;
        }

        let link = absolute_url.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None for empty hrefs, hrefs that fail to resolve, and anything
/// that does not resolve to http(s) (`mailto:`, `javascript:`, `tel:`, ...).
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}
