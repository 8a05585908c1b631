//! Scheduler for the crawl frontier and politeness delay
//!
//! This module handles:
//! - FIFO frontier with set semantics (see [`CrawlState`])
//! - The page budget: no URL is handed out once `max_pages` pages were visited
//! - Per-host minimum spacing between requests
//! - Cancellation while waiting for a host to become ready

use crate::config::CrawlerConfig;
use crate::state::{CrawlState, DomainState, PageState};
use crate::url::extract_domain;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// A URL ready to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledUrl {
    /// The URL to fetch
    pub url: Url,

    /// Lowercase host of `url`, the key for the politeness delay
    pub domain: String,
}

/// Scheduler owns the frontier, the visited set and per-host timing
///
/// Pages are handed out one at a time in discovery order. The coordinator
/// reports each visit back through [`Scheduler::complete`] and
/// [`Scheduler::record_request`].
pub struct Scheduler {
    /// Frontier and visited set
    state: CrawlState,

    /// Per-host request timing
    domain_states: HashMap<String, DomainState>,

    /// Minimum time between requests to the same host
    politeness_delay: Duration,

    /// Maximum number of visited pages
    max_pages: usize,

    cancel: CancellationToken,
}

impl Scheduler {
    /// Creates a scheduler whose frontier holds only `seed`
    pub fn new(seed: &Url, config: &CrawlerConfig) -> Self {
        Self {
            state: CrawlState::new(seed.as_str()),
            domain_states: HashMap::new(),
            politeness_delay: config.politeness_delay(),
            max_pages: config.max_pages,
            cancel: CancellationToken::new(),
        }
    }

    /// Stops handing out URLs once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Gets the next URL to fetch
    ///
    /// This method:
    /// 1. Returns None if the crawl was cancelled or the budget is used up
    /// 2. Pops the oldest URL from the frontier, None if there is none
    /// 3. Waits until the politeness delay for the URL's host has passed
    ///
    /// The returned URL is not marked visited yet; see [`Scheduler::complete`].
    pub async fn next_url(&mut self) -> Option<ScheduledUrl> {
        loop {
            if self.cancel.is_cancelled() || self.budget_exhausted() {
                return None;
            }

            let raw = self.state.pop_next()?;
            if self.state.is_visited(&raw) {
                continue;
            }

            let url = match Url::parse(&raw) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Dropping unparseable URL {}: {}", raw, e);
                    continue;
                }
            };

            let Some(domain) = extract_domain(&url) else {
                tracing::warn!("Dropping URL without host: {}", url);
                continue;
            };

            let wait = self
                .domain_states
                .get(&domain)
                .and_then(|state| state.time_until_next_request(self.politeness_delay, Instant::now()));

            if let Some(wait) = wait {
                tracing::debug!("Waiting {:?} before next request to {}", wait, domain);
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return None,
                    _ = tokio::time::sleep(wait) => {}
                }
            }

            tracing::debug!("Scheduling URL: {}", url);
            return Some(ScheduledUrl { url, domain });
        }
    }

    /// Records that a request to `domain` just finished
    ///
    /// The next request to the same host waits for the politeness delay
    /// counted from this moment.
    pub fn record_request(&mut self, domain: &str) {
        let now = Instant::now();
        self.domain_states
            .entry(domain.to_string())
            .or_insert_with(DomainState::new)
            .record_request(now);
    }

    /// Marks a URL as visited with its final state
    pub fn complete(&mut self, url: &Url, state: PageState) {
        tracing::debug!("Visited {} ({})", url, state);
        self.state.mark_visited(url.as_str(), state);
    }

    /// Adds discovered links to the frontier, returning how many were new
    pub fn enqueue<I, S>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.enqueue_all(links)
    }

    /// Returns true once `max_pages` pages have been visited
    pub fn budget_exhausted(&self) -> bool {
        self.state.visited_count() >= self.max_pages
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.state.frontier_len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.state.frontier_is_empty()
    }

    pub fn pages_visited(&self) -> usize {
        self.state.visited_count()
    }

    pub fn pages_processed(&self) -> usize {
        self.state.count_in_state(PageState::Processed)
    }

    pub fn pages_failed(&self) -> usize {
        self.state.count_in_state(PageState::FetchFailed)
    }
}
