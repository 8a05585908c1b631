use std::time::{Duration, Instant};

/// Tracks the requests made to one host during a crawl
///
/// Used to keep consecutive requests to the same host at least the
/// politeness delay apart.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Timestamp of the last request to this host
    pub last_request_time: Option<Instant>,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a request was made to this host
    pub fn record_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    ///
    /// # Arguments
    ///
    /// * `min_delay` - Minimum spacing between two requests to the host
    /// * `now` - The current time instant
    pub fn time_until_next_request(&self, min_delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_delay {
            Some(min_delay - elapsed)
        } else {
            None
        }
    }
}
