//! Input validation rules for user-supplied fields.
//!
//! # Invariants
//! - Project names must not be blank after trim.
//! - Domains and backlink URLs must be absolute (`scheme://host...`).
//! - Validation never mutates input; callers normalize before submitting.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ABSOLUTE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+(?:[/?#]\S*)?$")
        .unwrap_or_else(|err| panic!("absolute url pattern must compile: {err}"))
});

/// Validation failures for domain input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Project name is empty or whitespace only.
    BlankProjectName,
    /// Project domain is not an absolute URL.
    InvalidDomain(String),
    /// Keyword term is empty or whitespace only.
    BlankKeywordTerm,
    /// Ranking position must be `>= 1`.
    InvalidPosition(i64),
    /// Audit score must be within `0..=100`.
    InvalidAuditScore(u32),
    /// Backlink endpoint is not an absolute URL.
    InvalidUrl { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankProjectName => write!(f, "Project name is required"),
            Self::InvalidDomain(value) => {
                write!(f, "Please enter a valid domain URL (got `{value}`)")
            }
            Self::BlankKeywordTerm => write!(f, "keyword term must not be blank"),
            Self::InvalidPosition(value) => {
                write!(f, "ranking position must be >= 1, got {value}")
            }
            Self::InvalidAuditScore(value) => {
                write!(f, "audit score must be within 0..=100, got {value}")
            }
            Self::InvalidUrl { field, value } => {
                write!(f, "{field} must be an absolute URL (got `{value}`)")
            }
        }
    }
}

impl Error for ValidationError {}

/// Returns whether `value` is an absolute URL with scheme and host.
pub fn is_absolute_url(value: &str) -> bool {
    ABSOLUTE_URL.is_match(value)
}

pub(crate) fn validate_project_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankProjectName);
    }
    Ok(())
}

pub(crate) fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    if !is_absolute_url(domain) {
        return Err(ValidationError::InvalidDomain(domain.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{is_absolute_url, validate_domain, validate_project_name, ValidationError};

    #[test]
    fn absolute_urls_are_accepted() {
        assert!(is_absolute_url("https://shop.test"));
        assert!(is_absolute_url("http://localhost:3000/landing?ref=a"));
        assert!(is_absolute_url("https://example.com/"));
    }

    #[test]
    fn bare_domains_and_broken_urls_are_rejected() {
        assert!(!is_absolute_url("example.com"));
        assert!(!is_absolute_url("https://"));
        assert!(!is_absolute_url("https://exa mple.com"));
        assert!(!is_absolute_url(""));
        assert!(!is_absolute_url("://example.com"));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            validate_project_name("   "),
            Err(ValidationError::BlankProjectName)
        );
        assert!(validate_project_name("Shop").is_ok());
    }

    #[test]
    fn domain_error_keeps_offending_value() {
        let err = validate_domain("example.com").unwrap_err();
        assert_eq!(err, ValidationError::InvalidDomain("example.com".to_string()));
        assert!(err.to_string().contains("valid domain URL"));
    }
}
