//! Free-text email matching

use super::EmailAddress;
use once_cell::sync::Lazy;
use regex::Regex;

/// Candidate addresses inside running text
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]{2,}@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
        .expect("EMAIL_PATTERN: hardcoded regex is valid")
});

/// A whole string that is exactly one address
static FULL_EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]{2,}@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("FULL_EMAIL_PATTERN: hardcoded regex is valid")
});

/// Extracts every plausible email address from `text`
///
/// Matches are lowercased and re-validated against the shape rules of
/// [`EmailAddress`]; matches failing them are dropped silently. The result
/// keeps first-appearance order and is NOT de-duplicated.
///
/// # Examples
///
/// ```
/// use mailtrawl::extract_emails;
///
/// let found = extract_emails("Contact us at test@example.com or support@domain.com");
/// let found: Vec<&str> = found.iter().map(|e| e.as_str()).collect();
/// assert_eq!(found, ["test@example.com", "support@domain.com"]);
/// ```
pub fn extract_emails(text: &str) -> Vec<EmailAddress> {
    if text.is_empty() {
        return Vec::new();
    }

    EMAIL_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let email = EmailAddress::parse(m.as_str());
            if email.is_none() {
                tracing::trace!("Discarding malformed candidate: {}", m.as_str());
            }
            email
        })
        .collect()
}

/// Checks whether the whole string is a single well-formed address
///
/// Unlike [`EmailAddress::parse`] this does not trim or lowercase first.
pub fn is_valid_email(email: &str) -> bool {
    FULL_EMAIL_PATTERN.is_match(email) && EmailAddress::parse(email).is_some()
}

/// Keeps only the entries of `emails` accepted by [`is_valid_email`]
pub fn filter_valid_emails<S: AsRef<str>>(emails: &[S]) -> Vec<String> {
    emails
        .iter()
        .map(AsRef::as_ref)
        .filter(|email| is_valid_email(email))
        .map(str::to_string)
        .collect()
}
