//! HTTP fetcher implementation
//!
//! This module turns single transport requests into a bounded-retry fetch:
//! - A fixed per-request timeout (a timeout is a retryable failure)
//! - Up to `max_attempts` attempts with exponential backoff
//! - Retries only on transport failures and on HTTP 429/500/502/503/504
//! - Cancellation of the backoff wait and of the in-flight request

use crate::config::CrawlerConfig;
use crate::crawler::transport::{HttpTransport, RawResponse, TransportError};
use crate::{FetchCause, FetchError};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// HTTP status codes worth another attempt
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Returns true for status codes in [`RETRYABLE_STATUS_CODES`]
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}

/// How often and how patiently a URL is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,

    /// Wait before the second attempt; doubled for every further attempt
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff_base: config.backoff_base(),
        }
    }

    /// Wait before attempt number `attempt` (1-based)
    ///
    /// | Attempt | Delay |
    /// |---------|-------|
    /// | 1 | 0 |
    /// | 2 | base |
    /// | 3 | base * 2 |
    /// | n | base * 2^(n-2) |
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(16);
        self.backoff_base.saturating_mul(1 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,

    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Page body
    pub body: String,

    /// Attempts needed
    pub attempts: u32,
}

/// Fetches pages over an [`HttpTransport`] with timeout and retry policy
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            transport,
            timeout,
            retry,
            cancel: CancellationToken::new(),
        }
    }

    /// Builds a fetcher from crawler settings
    pub fn from_config(transport: Arc<dyn HttpTransport>, config: &CrawlerConfig) -> Self {
        Self::new(
            transport,
            config.request_timeout(),
            RetryPolicy::from_config(config),
        )
    }

    /// Aborts backoff waits and in-flight requests once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Success |
    /// | HTTP 429, 500, 502, 503, 504 | Retry with backoff |
    /// | Timeout / connection failure | Retry with backoff |
    /// | Any other status | Fail immediately |
    /// | Cancellation | Fail immediately |
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - The page body
    /// * `Err(FetchError)` - The last failure once attempts are exhausted,
    ///   or the first non-retryable one
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let delay = self.retry.delay_before(attempt);
            if !delay.is_zero() {
                tracing::debug!("Waiting {:?} before attempt {} for {}", delay, attempt, url);
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        return Err(fetch_error(url, FetchCause::Cancelled, attempt - 1));
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            let cause = match self.attempt(url).await {
                Ok(response) if response.is_success() => {
                    return Ok(FetchedPage {
                        url: url.to_string(),
                        final_url: response.final_url,
                        status: response.status,
                        body: response.body,
                        attempts: attempt,
                    });
                }
                Ok(response) => FetchCause::Status(response.status),
                Err(cause) => cause,
            };

            if !cause.is_retryable() || attempt >= self.retry.max_attempts {
                return Err(fetch_error(url, cause, attempt));
            }

            tracing::warn!(
                "Attempt {}/{} for {} failed ({}), retrying",
                attempt,
                self.retry.max_attempts,
                url,
                cause
            );
        }
    }

    /// Sends one request, bounded by the timeout and the cancellation token
    async fn attempt(&self, url: &str) -> Result<RawResponse, FetchCause> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FetchCause::Cancelled),
            result = tokio::time::timeout(self.timeout, self.transport.get(url)) => match result {
                Err(_elapsed) => Err(FetchCause::Timeout),
                Ok(Err(TransportError::Timeout)) => Err(FetchCause::Timeout),
                Ok(Err(e)) => Err(FetchCause::Transport(e.to_string())),
                Ok(Ok(response)) => Ok(response),
            },
        }
    }
}

fn fetch_error(url: &str, cause: FetchCause, attempts: u32) -> FetchError {
    FetchError {
        url: url.to_string(),
        cause,
        attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Replays a fixed script of outcomes, then answers 200 forever
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<u16, TransportError>>>,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<u16, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front().unwrap_or(Ok(200));
            next.map(|status| RawResponse {
                status,
                final_url: url.to_string(),
                body: format!("<p>status {}</p>", status),
            })
        }
    }

    /// Never answers within any sensible timeout
    struct SlowTransport {
        calls: AtomicU32,
    }

    #[async_trait]
    impl HttpTransport for SlowTransport {
        async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(RawResponse {
                status: 200,
                final_url: url.to_string(),
                body: String::new(),
            })
        }
    }

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1),
        }
    }

    fn fetcher(transport: Arc<dyn HttpTransport>) -> Fetcher {
        Fetcher::new(transport, Duration::from_secs(2), quick_policy())
    }

    #[test]
    fn test_retryable_status_codes() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retryable_status(status));
        }
        for status in [200, 301, 400, 401, 403, 404, 410, 501] {
            assert!(!is_retryable_status(status));
        }
    }

    #[test]
    fn test_default_backoff_curve() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_secs(1));
        assert_eq!(policy.delay_before(3), Duration::from_secs(2));
        assert_eq!(policy.delay_before(4), Duration::from_secs(4));
    }

    #[test]
    fn test_policy_from_config() {
        let config = CrawlerConfig {
            max_attempts: 5,
            backoff_base: 250,
            ..CrawlerConfig::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay_before(3), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let transport = ScriptedTransport::new(vec![Ok(200)]);
        let page = fetcher(transport.clone())
            .fetch("https://example.com/")
            .await
            .unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.attempts, 1);
        assert_eq!(page.body, "<p>status 200</p>");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_server_error_exhausts_attempts() {
        let transport = ScriptedTransport::new(vec![Ok(500), Ok(500), Ok(500)]);
        let err = fetcher(transport.clone())
            .fetch("https://example.com/broken")
            .await
            .unwrap_err();

        assert_eq!(err.url, "https://example.com/broken");
        assert_eq!(err.cause, FetchCause::Status(500));
        assert_eq!(err.attempts, 3);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Ok(404)]);
        let err = fetcher(transport.clone())
            .fetch("https://example.com/missing")
            .await
            .unwrap_err();

        assert_eq!(err.cause, FetchCause::Status(404));
        assert_eq!(err.attempts, 1);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let transport = ScriptedTransport::new(vec![
            Ok(503),
            Err(TransportError::Connect("connection refused".to_string())),
            Ok(200),
        ]);
        let page = fetcher(transport.clone())
            .fetch("https://example.com/")
            .await
            .unwrap();

        assert_eq!(page.attempts, 3);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let transport = ScriptedTransport::new(vec![Ok(429), Ok(200)]);
        let page = fetcher(transport.clone())
            .fetch("https://example.com/")
            .await
            .unwrap();

        assert_eq!(page.attempts, 2);
    }

    #[tokio::test]
    async fn test_timeout_is_retryable_failure() {
        let transport = Arc::new(SlowTransport {
            calls: AtomicU32::new(0),
        });
        let fetcher = Fetcher::new(transport.clone(), Duration::from_millis(20), quick_policy());

        let err = fetcher.fetch("https://example.com/slow").await.unwrap_err();

        assert_eq!(err.cause, FetchCause::Timeout);
        assert_eq!(err.attempts, 3);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancelled_fetch_fails_without_retry() {
        let transport = ScriptedTransport::new(vec![Ok(200)]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = fetcher(transport.clone())
            .with_cancellation(cancel)
            .fetch("https://example.com/")
            .await
            .unwrap_err();

        assert_eq!(err.cause, FetchCause::Cancelled);
        assert_eq!(transport.calls(), 0);
    }
}
