//! Tenant detection from an observed host name.
//!
//! Deployments address tenants as `<tenant>.<base-domain>` where the base
//! domain has exactly two labels. A host is therefore tenant-qualified when it
//! splits into an odd number of dot-separated segments:
//!
//! | host                        | segments | tenant label |
//! |-----------------------------|----------|--------------|
//! | `example.com`               | 2        | none         |
//! | `acme.example.com`          | 3        | `acme.`      |
//! | `acme.staging.example.com`  | 4        | none         |
//!
//! The rule misclassifies base domains with a different label count (for
//! instance `example.co.uk` looks tenant-qualified). It is kept as-is because
//! deployed hosts depend on it.

use std::fmt;

/// Protocol prefixes removed before the host is split. At most one is removed.
pub const PROTOCOL_PREFIXES: [&str; 2] = ["http://", "https://"];

/// The tenant segment of a host name, including its trailing `.`.
///
/// The trailing dot lets the label be substituted directly in front of the
/// base domain of a URL template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantLabel(String);

impl TenantLabel {
    /// Builds a label from a bare subdomain segment such as `acme`.
    pub fn from_segment(segment: &str) -> Self {
        TenantLabel(format!("{segment}."))
    }

    /// The label including the trailing dot, e.g. `acme.`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The label without the trailing dot, e.g. `acme`.
    pub fn segment(&self) -> &str {
        self.0.strip_suffix('.').unwrap_or(&self.0)
    }
}

impl fmt::Display for TenantLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Removes the first matching protocol prefix, if any.
pub fn strip_protocol(host: &str) -> &str {
    PROTOCOL_PREFIXES
        .iter()
        .find_map(|prefix| host.strip_prefix(prefix))
        .unwrap_or(host)
}

/// Extracts the tenant label from an observed host.
///
/// Total over all inputs: hosts that are empty or split into an even number of
/// segments yield `None`.
///
/// ```rust
/// use sekisho_core::host::parse_tenant_label;
///
/// assert_eq!(parse_tenant_label("https://acme.example.com").unwrap().as_str(), "acme.");
/// assert!(parse_tenant_label("https://example.com").is_none());
/// ```
pub fn parse_tenant_label(host: &str) -> Option<TenantLabel> {
    let host_name = strip_protocol(host);
    if host_name.is_empty() {
        return None;
    }

    let segments: Vec<&str> = host_name.split('.').collect();
    if segments.len() % 2 == 0 {
        return None;
    }

    segments.first().map(|segment| TenantLabel::from_segment(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(host: &str) -> Option<String> {
        parse_tenant_label(host).map(|l| l.as_str().to_string())
    }

    #[test]
    fn test_base_domain_has_no_tenant() {
        assert_eq!(label("example.com"), None);
        assert_eq!(label("https://example.com"), None);
        assert_eq!(label("http://example.com"), None);
    }

    #[test]
    fn test_tenant_subdomain() {
        assert_eq!(label("acme.example.com"), Some("acme.".to_string()));
        assert_eq!(label("https://acme.example.com"), Some("acme.".to_string()));
    }

    #[test]
    fn test_nested_subdomain_has_no_tenant() {
        assert_eq!(label("acme.staging.example.com"), None);
        assert_eq!(label("https://acme.staging.example.com"), None);
    }

    #[test]
    fn test_five_segments_is_tenant_qualified() {
        assert_eq!(label("a.b.c.example.com"), Some("a.".to_string()));
    }

    #[test]
    fn test_empty_host() {
        assert_eq!(label(""), None);
        assert_eq!(label("https://"), None);
    }

    #[test]
    fn test_trailing_slash_base_address() {
        assert_eq!(label("https://acme.example.com/"), Some("acme.".to_string()));
        assert_eq!(label("https://example.com/"), None);
    }

    #[test]
    fn test_only_one_prefix_is_stripped() {
        assert_eq!(strip_protocol("https://http://x"), "http://x");
        assert_eq!(strip_protocol("ftp://example.com"), "ftp://example.com");
    }

    #[test]
    fn test_three_label_base_domain_is_misclassified() {
        // Known fragility of the parity rule.
        assert_eq!(label("example.co.uk"), Some("example.".to_string()));
    }

    #[test]
    fn test_label_segment() {
        let label = TenantLabel::from_segment("acme");
        assert_eq!(label.as_str(), "acme.");
        assert_eq!(label.segment(), "acme");
        assert_eq!(label.to_string(), "acme.");
    }
}
