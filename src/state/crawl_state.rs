use crate::state::PageState;
use std::collections::{HashMap, HashSet, VecDeque};

/// Frontier and visited set of a single crawl
///
/// The frontier is a FIFO queue with set semantics: a URL is queued at most
/// once at a time, and never once it has been visited. Pages are visited in
/// discovery order, which makes the set of pages that fit in the budget
/// reproducible between runs.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    /// URLs waiting to be visited, in discovery order
    frontier: VecDeque<String>,

    /// Membership index for `frontier`
    queued: HashSet<String>,

    /// Visited URLs and how their visit ended
    visited: HashMap<String, PageState>,
}

impl CrawlState {
    /// Creates a state whose frontier holds only `seed`
    pub fn new(seed: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.enqueue(seed);
        state
    }

    /// Adds a URL to the frontier
    ///
    /// Returns false if the URL is already queued or visited.
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains_key(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.frontier.push_back(url);
        true
    }

    /// Adds several URLs to the frontier, returning how many were new
    pub fn enqueue_all<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for url in urls {
            if self.enqueue(url) {
                added += 1;
            }
        }
        added
    }

    /// Removes and returns the oldest queued URL
    pub fn pop_next(&mut self) -> Option<String> {
        let url = self.frontier.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Records the outcome of a visit
    pub fn mark_visited(&mut self, url: impl Into<String>, state: PageState) {
        let url = url.into();
        self.queued.remove(&url);
        self.frontier.retain(|queued| queued != &url);
        self.visited.insert(url, state);
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains_key(url)
    }

    /// Number of visited URLs (what the page budget counts)
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of visited URLs that ended in `state`
    pub fn count_in_state(&self, state: PageState) -> usize {
        self.visited.values().filter(|s| **s == state).count()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn frontier_is_empty(&self) -> bool {
        self.frontier.is_empty()
    }
}
