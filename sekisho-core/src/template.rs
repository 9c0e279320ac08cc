//! Tenant placeholder substitution for URL templates.

use crate::host::TenantLabel;

/// Placeholder marking where the tenant label goes in a URL template.
///
/// The trailing dot is part of the placeholder so that substituting an empty
/// label collapses `https://{0}.example.com/` to `https://example.com/`.
pub const TENANT_PLACEHOLDER: &str = "{0}.";

/// Substitutes the tenant label into a URL template.
///
/// Exactly one substitution point is supported. Templates without the
/// placeholder are returned unchanged, which is what host-only deployments rely
/// on.
///
/// ```rust
/// use sekisho_core::host::TenantLabel;
/// use sekisho_core::template::resolve_template;
///
/// let acme = TenantLabel::from_segment("acme");
/// assert_eq!(
///     resolve_template("https://{0}.example.com/", Some(&acme)),
///     "https://acme.example.com/"
/// );
/// assert_eq!(resolve_template("https://{0}.example.com/", None), "https://example.com/");
/// ```
pub fn resolve_template(template: &str, label: Option<&TenantLabel>) -> String {
    let replacement = label.map(TenantLabel::as_str).unwrap_or_default();
    template.replacen(TENANT_PLACEHOLDER, replacement, 1)
}

/// Whether the template carries a tenant placeholder.
pub fn has_placeholder(template: &str) -> bool {
    template.contains(TENANT_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_substitution() {
        let label = TenantLabel::from_segment("acme");
        assert_eq!(
            resolve_template("https://{0}.api.example.com", Some(&label)),
            "https://acme.api.example.com"
        );
    }

    #[test]
    fn test_empty_label_collapses_placeholder() {
        assert_eq!(
            resolve_template("https://{0}.example.com/", None),
            "https://example.com/"
        );
    }

    #[test]
    fn test_template_without_placeholder_is_unchanged() {
        let label = TenantLabel::from_segment("acme");
        assert_eq!(
            resolve_template("https://auth.example.com/", Some(&label)),
            "https://auth.example.com/"
        );
        assert!(!has_placeholder("https://auth.example.com/"));
    }

    #[test]
    fn test_only_first_placeholder_is_substituted() {
        let label = TenantLabel::from_segment("acme");
        assert_eq!(
            resolve_template("https://{0}.example.com/{0}.x", Some(&label)),
            "https://acme.example.com/{0}.x"
        );
    }

    #[test]
    fn test_placeholder_without_dot_is_not_substituted() {
        let label = TenantLabel::from_segment("acme");
        assert_eq!(
            resolve_template("https://{0}example.com/", Some(&label)),
            "https://{0}example.com/"
        );
    }
}
