//! Subdomain wildcard patterns.
//!
//! A pattern is a URL or host with `{0}` standing for exactly one DNS label,
//! such as `https://{0}.example.com/signin-oidc`. Patterns are used to detect
//! the tenant addressed by an incoming host and to accept redirect URIs for any
//! tenant subdomain.

use regex::Regex;

use crate::error::ValidationError;

const WILDCARD: &str = "{0}";
const LABEL: &str = "([A-Za-z0-9_-]+)";

/// Whether `value` is a single label that `{0}` can match.
pub fn is_subdomain_label(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A compiled subdomain pattern.
#[derive(Debug, Clone)]
pub struct SubdomainPattern {
    format: String,
    regex: Regex,
}

impl SubdomainPattern {
    /// Compiles `format`. Matching is case-insensitive and anchored at both ends.
    pub fn new(format: impl Into<String>) -> Result<Self, ValidationError> {
        let format = format.into();
        if format.trim().is_empty() {
            return Err(ValidationError::InvalidPattern(
                "pattern cannot be empty".to_string(),
            ));
        }

        let body = format
            .split(WILDCARD)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(LABEL);
        let regex = Regex::new(&format!("(?i)^{body}$"))
            .map_err(|e| ValidationError::InvalidPattern(format!("{format}: {e}")))?;

        Ok(Self { format, regex })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// Returns the label matched by the first `{0}`, if the input matches.
    pub fn capture<'a>(&self, input: &'a str) -> Option<&'a str> {
        self.regex
            .captures(input)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }
}

/// Accepts redirect URIs matching any of a set of wildcard formats.
#[derive(Debug, Clone, Default)]
pub struct WildcardDomainMatcher {
    patterns: Vec<SubdomainPattern>,
}

impl WildcardDomainMatcher {
    pub fn new<I, S>(formats: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = formats
            .into_iter()
            .map(SubdomainPattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_match(&self, uri: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_label() {
        let pattern = SubdomainPattern::new("{0}.api.example.com").unwrap();
        assert_eq!(pattern.capture("acme.api.example.com"), Some("acme"));
        assert_eq!(pattern.capture("ACME.API.example.com"), Some("ACME"));
        assert_eq!(pattern.capture("api.example.com"), None);
        assert_eq!(pattern.capture("a.b.api.example.com"), None);
    }

    #[test]
    fn test_is_subdomain_label() {
        for label in ["acme", "Acme-Corp", "tenant_42"] {
            assert!(is_subdomain_label(label), "{label:?}");
        }
        for label in ["", "a,b", "acme corp", "acme.eu", "a/b", " acme", "ac\tme"] {
            assert!(!is_subdomain_label(label), "{label:?}");
        }
    }

    #[test]
    fn test_literal_parts_are_escaped() {
        let pattern = SubdomainPattern::new("{0}.example.com").unwrap();
        assert!(!pattern.is_match("acme.exampleXcom"));
    }

    #[test]
    fn test_pattern_without_wildcard() {
        let pattern = SubdomainPattern::new("https://example.com/cb").unwrap();
        assert!(pattern.is_match("https://example.com/cb"));
        assert_eq!(pattern.capture("https://example.com/cb"), None);
    }

    #[test]
    fn test_empty_pattern_is_rejected() {
        assert!(matches!(
            SubdomainPattern::new(""),
            Err(ValidationError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_wildcard_matcher() {
        let matcher = WildcardDomainMatcher::new([
            "https://{0}.example.com/signin-oidc",
            "https://{0}.example.com/signout-callback-oidc",
        ])
        .unwrap();

        assert!(matcher.is_match("https://acme.example.com/signin-oidc"));
        assert!(matcher.is_match("https://globex.example.com/signout-callback-oidc"));
        assert!(!matcher.is_match("https://example.com/signin-oidc"));
        assert!(!matcher.is_match("https://acme.example.com/signin-oidc?x=1"));
        assert!(!matcher.is_match("https://acme.evil.com/signin-oidc"));
        assert!(!matcher.is_match("https://a.b.example.com/signin-oidc"));
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        let matcher = WildcardDomainMatcher::default();
        assert!(matcher.is_empty());
        assert!(!matcher.is_match("https://acme.example.com/signin-oidc"));
    }
}
