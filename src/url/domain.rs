use url::Url;

/// Extracts the lowercase host of a URL, without its port
///
/// Returns None for URLs that carry no host at all, such as `mailto:` or
/// `data:` URLs.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use mailtrawl::url::extract_domain;
///
/// let url = Url::parse("https://Shop.Example.COM:8443/cart").unwrap();
/// assert_eq!(extract_domain(&url), Some("shop.example.com".to_string()));
///
/// let url = Url::parse("mailto:info@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_ignores_port_and_path() {
        let url = Url::parse("http://127.0.0.1:4010/contact?x=1#top").unwrap();
        assert_eq!(extract_domain(&url), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_extract_domain_keeps_subdomain() {
        let url = Url::parse("https://kontakt.firma.pl/").unwrap();
        assert_eq!(extract_domain(&url), Some("kontakt.firma.pl".to_string()));
    }

    #[test]
    fn test_extract_domain_without_host() {
        let url = Url::parse("javascript:void(0)").unwrap();
        assert_eq!(extract_domain(&url), None);
    }
}
