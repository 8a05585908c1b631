//! Email address identification
//!
//! This module finds email-like substrings in free text and validates their
//! shape. An [`EmailAddress`] can only be built through the shape rules, so
//! every address that reaches a report has passed the same validation.

mod matcher;

pub use matcher::{extract_emails, filter_valid_emails, is_valid_email};

use serde::Serialize;
use std::fmt;

/// A lowercase, shape-validated email address
///
/// Shape rules:
/// - no whitespace anywhere
/// - exactly one `@`
/// - local part of at least 2 characters
/// - a domain with at least one `.`, whose first label has at least 1
///   character and whose final label has at least 2
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Lowercases and trims `candidate`, then checks the shape rules
    ///
    /// Returns None when the candidate does not look like an address. A
    /// rejection is an expected outcome, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailtrawl::EmailAddress;
    ///
    /// let email = EmailAddress::parse(" Biuro@Example.PL ").unwrap();
    /// assert_eq!(email.as_str(), "biuro@example.pl");
    ///
    /// assert!(EmailAddress::parse("a@b.c").is_none());
    /// ```
    pub fn parse(candidate: &str) -> Option<Self> {
        let email = candidate.trim().to_lowercase();
        if has_valid_shape(&email) {
            Some(Self(email))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn has_valid_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') || local.chars().count() < 2 {
        return false;
    }

    let mut labels = domain.split('.');
    let first = labels.next().unwrap_or_default();
    let Some(last) = labels.last() else {
        // no dot in the domain
        return false;
    };

    !first.is_empty() && last.chars().count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_minimal_valid_shape() {
        let email = EmailAddress::parse("ab@c.de").unwrap();
        assert_eq!(email.as_str(), "ab@c.de");
    }

    #[test]
    fn test_lowercases() {
        let email = EmailAddress::parse("John.Doe@Example.COM").unwrap();
        assert_eq!(email.to_string(), "john.doe@example.com");
    }

    #[test]
    fn test_rejects_short_final_label() {
        assert!(EmailAddress::parse("a@b.c").is_none());
        assert!(EmailAddress::parse("ab@c.d").is_none());
    }

    #[test]
    fn test_rejects_short_local_part() {
        assert!(EmailAddress::parse("a@example.com").is_none());
    }

    #[test]
    fn test_rejects_empty_first_domain_label() {
        assert!(EmailAddress::parse("ab@.com").is_none());
    }

    #[test]
    fn test_rejects_domain_without_dot() {
        assert!(EmailAddress::parse("test@domain").is_none());
        assert!(EmailAddress::parse("test@").is_none());
    }

    #[test]
    fn test_rejects_embedded_whitespace() {
        assert!(EmailAddress::parse("jo hn@example.com").is_none());
        assert!(EmailAddress::parse("john@exa\tmple.com").is_none());
    }

    #[test]
    fn test_rejects_missing_or_repeated_at() {
        assert!(EmailAddress::parse("test.domain.com").is_none());
        assert!(EmailAddress::parse("ab@cd@ef.com").is_none());
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let email = EmailAddress::parse("\n  info@site.org \t").unwrap();
        assert_eq!(email.as_str(), "info@site.org");
    }
}
