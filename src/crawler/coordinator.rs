//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other pieces together:
//! - Pulling URLs from the scheduler within the page budget
//! - Fetching each page once (with retries) through the fetcher
//! - Scanning the page and extracting its same-site links from one parse
//! - Recording findings and feeding new links back to the frontier

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::parse_page;
use crate::crawler::results::CrawlResults;
use crate::crawler::scheduler::{ScheduledUrl, Scheduler};
use crate::crawler::transport::{HttpTransport, ReqwestTransport};
use crate::output::{aggregate, CrawlStatistics};
use crate::state::PageState;
use crate::url::{parse_seed_url, SiteScope};
use crate::{FetchCause, Result};
use chrono::{DateTime, Utc};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main crawler coordinator structure
///
/// One coordinator owns the whole state of one crawl: frontier, visited set,
/// per-host timing, the HTTP transport and the findings collected so far.
pub struct Coordinator {
    seed: Url,
    scope: SiteScope,
    scheduler: Scheduler,
    fetcher: Fetcher,
    results: CrawlResults,
    cancel: CancellationToken,
    started_at: DateTime<Utc>,
    elapsed: Duration,
}

impl Coordinator {
    /// Creates a coordinator that fetches over a `reqwest` client
    ///
    /// # Arguments
    ///
    /// * `seed` - The URL the crawl starts from; it also defines the site
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(TrawlError)` - The seed is not an absolute http(s) URL, or the
    ///   HTTP client could not be built
    pub fn new(seed: &str, config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config.user_agent, &config.crawler)?;
        Self::with_transport(seed, config, Arc::new(transport))
    }

    /// Creates a coordinator over an arbitrary transport
    pub fn with_transport(
        seed: &str,
        config: &Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let seed = parse_seed_url(seed)?;
        let scope = SiteScope::from_seed(&seed)?;
        let cancel = CancellationToken::new();

        Ok(Self {
            scheduler: Scheduler::new(&seed, &config.crawler).with_cancellation(cancel.clone()),
            fetcher: Fetcher::from_config(transport, &config.crawler)
                .with_cancellation(cancel.clone()),
            seed,
            scope,
            results: CrawlResults::new(),
            cancel,
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
        })
    }

    /// Stops the crawl once `cancel` fires
    ///
    /// Cancellation interrupts the politeness wait, the retry backoff and the
    /// in-flight request. Findings collected up to that point are kept.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.scheduler = self.scheduler.with_cancellation(cancel.clone());
        self.fetcher = self.fetcher.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    /// Token that cancels this crawl
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the main crawl loop
    ///
    /// Ends when the frontier is empty, the page budget is used up or the
    /// crawl is cancelled. Fetch failures never end the loop.
    pub async fn run(&mut self) -> &CrawlResults {
        tracing::info!("Starting crawl of {} (site: {})", self.seed, self.scope.host());

        self.started_at = Utc::now();
        let start_time = Instant::now();

        while let Some(scheduled) = self.scheduler.next_url().await {
            if self.process_url(&scheduled).await.is_break() {
                break;
            }

            let visited = self.scheduler.pages_visited();
            if visited % 10 == 0 {
                let rate = visited as f64 / start_time.elapsed().as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
                    visited,
                    self.scheduler.frontier_size(),
                    rate
                );
            }
        }

        self.elapsed = start_time.elapsed();

        if self.cancel.is_cancelled() {
            tracing::warn!(
                "Crawl cancelled after {} pages in {:?}",
                self.scheduler.pages_visited(),
                self.elapsed
            );
        } else if self.scheduler.budget_exhausted() && !self.scheduler.is_empty() {
            tracing::info!(
                "Page budget reached with {} URLs left in frontier",
                self.scheduler.frontier_size()
            );
        }

        tracing::info!(
            "Crawl completed: {} pages visited in {:?}, {} pages with email addresses",
            self.scheduler.pages_visited(),
            self.elapsed,
            self.results.len()
        );

        &self.results
    }

    /// Processes a single URL
    ///
    /// This method:
    /// 1. Fetches the page
    /// 2. Parses it once, scanning for addresses and extracting links
    /// 3. Records the findings and marks the URL visited
    /// 4. Adds unvisited same-site links to the frontier
    ///
    /// A failed fetch marks the URL visited with no findings and no links.
    /// Breaks only when the fetch was cancelled; the URL then stays unvisited.
    async fn process_url(&mut self, scheduled: &ScheduledUrl) -> ControlFlow<()> {
        let url = &scheduled.url;
        tracing::info!("Processing {}", url);

        let fetched = self.fetcher.fetch(url.as_str()).await;
        self.scheduler.record_request(&scheduled.domain);

        let page = match fetched {
            Ok(page) => page,
            Err(e) if e.cause == FetchCause::Cancelled => {
                tracing::debug!("Fetch of {} cancelled", url);
                return ControlFlow::Break(());
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.scheduler.complete(url, PageState::FetchFailed);
                return ControlFlow::Continue(());
            }
        };

        if page.final_url != page.url {
            tracing::debug!("{} redirected to {}", page.url, page.final_url);
        }

        let parsed = parse_page(&page.body, url, &self.scope);

        if parsed.findings.is_empty() {
            tracing::warn!("No email addresses found on {}", url);
        } else {
            tracing::info!(
                "Found {} email address(es) on {}",
                parsed.findings.len(),
                url
            );
            self.results.record(url.as_str(), parsed.findings);
        }

        self.scheduler.complete(url, PageState::Processed);

        let found = parsed.links.len();
        let added = self.scheduler.enqueue(parsed.links);
        tracing::debug!("{} same-site link(s) on {}, {} new", found, url, added);

        ControlFlow::Continue(())
    }

    /// Findings collected so far
    pub fn results(&self) -> &CrawlResults {
        &self.results
    }

    pub fn into_results(self) -> CrawlResults {
        self.results
    }

    /// Summarizes the crawl so far
    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics {
            started_at: self.started_at,
            elapsed: self.elapsed,
            pages_visited: self.scheduler.pages_visited(),
            pages_processed: self.scheduler.pages_processed(),
            pages_failed: self.scheduler.pages_failed(),
            pages_with_findings: self.results.len(),
            total_findings: self.results.total_findings(),
            unique_emails: aggregate(&self.results).len(),
            frontier_remaining: self.scheduler.frontier_size(),
            cancelled: self.cancel.is_cancelled(),
        }
    }
}

/// Crawls the site of `seed` with the given configuration
///
/// # Arguments
///
/// * `seed` - The URL the crawl starts from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlResults)` - Findings of every page with at least one address,
///   in visiting order
/// * `Err(TrawlError)` - Setup failed (bad seed URL, HTTP client construction)
///
/// # Example
///
/// ```no_run
/// use mailtrawl::config::load_config;
/// use mailtrawl::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("mailtrawl.toml"))?;
/// let results = run_crawl("https://example.com/", &config).await?;
/// println!("{} pages with email addresses", results.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(seed: &str, config: &Config) -> Result<CrawlResults> {
    let mut coordinator = Coordinator::new(seed, config)?;
    coordinator.run().await;
    Ok(coordinator.into_results())
}
