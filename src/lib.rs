//! Mailtrawl: a polite same-site email harvester
//!
//! This crate crawls a website from a seed URL, scans every fetched page for
//! email addresses together with the text surrounding them, and aggregates
//! the findings into a report de-duplicated by address.

pub mod config;
pub mod crawler;
pub mod email;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Mailtrawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingDomain,
}

/// Why a page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchCause {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("crawl cancelled")]
    Cancelled,
}

impl FetchCause {
    /// Returns true if another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(code) => crawler::is_retryable_status(*code),
            Self::Timeout | Self::Transport(_) => true,
            Self::Cancelled => false,
        }
    }
}

/// A page that could not be fetched, after retries where applicable
#[derive(Debug, Clone, Error)]
#[error("Failed to fetch {url} after {attempts} attempt(s): {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: FetchCause,
    pub attempts: u32,
}

/// Result type alias for Mailtrawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResults, Finding, PageFindings};
pub use email::{extract_emails, EmailAddress};
pub use output::{aggregate, Report};

/// Crawls `seed_url` with default settings and a budget of `max_pages` pages
///
/// Returns the findings of every page that contained at least one email
/// address, in the order the pages were visited.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> mailtrawl::Result<()> {
/// let results = mailtrawl::process_website("https://example.com/", 100).await?;
/// for page in results.iter() {
///     println!("{}: {} address(es)", page.url, page.findings.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn process_website(seed_url: &str, max_pages: usize) -> Result<CrawlResults> {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config::validate(&config)?;
    crawler::crawl(seed_url, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_budget_is_a_config_error() {
        let err = process_website("https://example.com/", 0).await.unwrap_err();
        assert!(matches!(err, TrawlError::Config(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bad_seed_is_a_url_error() {
        let err = process_website("ftp://example.com/", 5).await.unwrap_err();
        assert!(matches!(err, TrawlError::UrlError(UrlError::InvalidScheme(_))));

        let err = process_website("not a url", 5).await.unwrap_err();
        assert!(matches!(err, TrawlError::UrlError(UrlError::Parse(_))));
    }
}
