//! Codec and ordered set for string-encoded redirect URI lists.
//!
//! Client applications store their redirect URIs as one string: the entries
//! joined with `,` and wrapped in `[` and `]`, e.g.
//! `[https://example.com/signin-oidc,https://acme.example.com/signin-oidc]`.
//! Commas inside entries are not escaped and entries are kept verbatim, so a
//! JSON array of quoted strings survives a parse/serialize round trip as well.
//! Other consumers of the stored field depend on this exact shape.

use std::fmt;

use thiserror::Error;

/// The encoded value is not wrapped in `[` and `]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("encoded URI list must be wrapped in '[' and ']': {0:?}")]
pub struct MalformedListError(pub String);

/// An ordered set of redirect URIs decoded from its stored representation.
///
/// The first entry is the canonical, non-tenant URI. Entries are only ever
/// appended; membership is exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectUriSet {
    uris: Vec<String>,
}

impl RedirectUriSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a stored list.
    ///
    /// Empty input and `[]` decode to an empty set.
    ///
    /// ```rust
    /// use sekisho_core::redirect_uris::RedirectUriSet;
    ///
    /// let encoded = "[https://example.com/signin-oidc,https://acme.example.com/signin-oidc]";
    /// let set = RedirectUriSet::parse(encoded).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.to_string(), encoded);
    /// ```
    pub fn parse(encoded: &str) -> Result<Self, MalformedListError> {
        if encoded.is_empty() {
            return Ok(Self::new());
        }

        let inner = encoded
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| MalformedListError(encoded.to_string()))?;

        if inner.is_empty() {
            return Ok(Self::new());
        }

        Ok(Self {
            uris: inner.split(',').map(str::to_string).collect(),
        })
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.uris.iter().any(|uri| uri == candidate)
    }

    /// Appends `candidate` unless it is already present.
    ///
    /// Returns whether the set changed.
    pub fn append_if_absent(&mut self, candidate: impl Into<String>) -> bool {
        let candidate = candidate.into();
        if self.contains(&candidate) {
            return false;
        }
        self.uris.push(candidate);
        true
    }

    /// The canonical entry every tenant-specific URI is derived from.
    pub fn canonical(&self) -> Option<&str> {
        self.uris.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Encodes the set into its stored representation.
    pub fn serialize(&self) -> String {
        format!("[{}]", self.uris.join(","))
    }
}

impl fmt::Display for RedirectUriSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl<S: Into<String>> FromIterator<S> for RedirectUriSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for uri in iter {
            set.append_if_absent(uri);
        }
        set
    }
}

/// Derives the tenant-specific variant of a canonical URI by inserting the
/// tenant label after its leading `https://`. A JSON-quoted entry keeps its
/// opening quote.
///
/// URIs that do not start with `https://` are returned unchanged.
///
/// ```rust
/// use sekisho_core::redirect_uris::derive_tenant_uri;
///
/// assert_eq!(
///     derive_tenant_uri("https://example.com/signin-oidc", "acme"),
///     "https://acme.example.com/signin-oidc"
/// );
/// ```
pub fn derive_tenant_uri(canonical: &str, label: &str) -> String {
    let (quote, uri) = match canonical.strip_prefix('"') {
        Some(rest) => ("\"", rest),
        None => ("", canonical),
    };
    match uri.strip_prefix("https://") {
        Some(rest) => format!("{quote}https://{label}.{rest}"),
        None => canonical.to_string(),
    }
}
