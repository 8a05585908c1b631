//! URL handling module for Mailtrawl
//!
//! This module provides seed URL validation, host extraction and the
//! same-site predicate used to decide which discovered links are followed.
//!
//! URLs are never normalized: two URLs are the same page iff their string
//! form after relative resolution is identical.

mod domain;

pub use domain::extract_domain;

use crate::UrlError;
use url::Url;

/// Parses and validates the seed URL of a crawl
///
/// # Arguments
///
/// * `seed` - The seed URL as given by the user
///
/// # Returns
///
/// * `Ok(Url)` - An absolute http(s) URL with a host
/// * `Err(UrlError)` - The URL is malformed, uses another scheme, or has no host
///
/// # Examples
///
/// ```
/// use mailtrawl::url::parse_seed_url;
///
/// assert!(parse_seed_url("https://example.com/contact").is_ok());
/// assert!(parse_seed_url("ftp://example.com/").is_err());
/// ```
pub fn parse_seed_url(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_http_scheme(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

fn is_http_scheme(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// The set of URLs considered part of the crawled site
///
/// A URL is in scope when it uses http or https and its host (and explicit
/// port, if any) is identical to the seed's. Subdomains are separate sites.
/// Scheme is not compared, so `http://a.com/x` and
/// `https://a.com/y` belong to the same site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    host: String,
    port: Option<u16>,
}

impl SiteScope {
    /// Builds the scope of the site `seed` belongs to
    pub fn from_seed(seed: &Url) -> Result<Self, UrlError> {
        let host = extract_domain(seed).ok_or(UrlError::MissingDomain)?;
        Ok(Self {
            host,
            port: seed.port(),
        })
    }

    /// Host of the site
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if `url` belongs to this site
    pub fn contains(&self, url: &Url) -> bool {
        is_http_scheme(url)
            && extract_domain(url).as_deref() == Some(self.host.as_str())
            && url.port() == self.port
    }
}
