//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport and fetching with retry logic
//! - Content scanning and same-site link extraction
//! - Frontier scheduling with budget and politeness delay
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod results;
mod scanner;
mod scheduler;
mod transport;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{is_retryable_status, FetchedPage, Fetcher, RetryPolicy, RETRYABLE_STATUS_CODES};
pub use parser::{extract_links, parse_page, ParsedPage};
pub use results::{CrawlResults, Finding, PageFindings};
pub use scanner::{scan_document, TEXT_EDITOR_CLASS};
pub use scheduler::{ScheduledUrl, Scheduler};
pub use transport::{build_http_client, HttpTransport, RawResponse, ReqwestTransport, TransportError};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the seed URL and build the HTTP client
/// 2. Visit pages in discovery order until the frontier is empty or the
///    page budget is used up
/// 3. Scan every fetched page for email addresses and follow its
///    same-site links
///
/// # Arguments
///
/// * `seed` - The URL the crawl starts from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlResults)` - Findings per page, in visiting order
/// * `Err(TrawlError)` - Setup failed
pub async fn crawl(seed: &str, config: &Config) -> Result<CrawlResults> {
    run_crawl(seed, config).await
}
