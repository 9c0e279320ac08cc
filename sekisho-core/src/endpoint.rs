//! Startup resolution of the tenant-specific authority and API base URL.
//!
//! A front-end client is served from `<tenant>.<base-domain>` and must talk to
//! the identity provider and API of the same tenant. The configured templates
//! carry a `{0}.` placeholder which is replaced with the tenant label detected
//! from the observed host.

use std::sync::OnceLock;

use crate::{
    Error,
    config::{API_BASE_URL_KEY, AUTHORITY_KEY, EndpointConfig},
    error::ConfigurationError,
    host::{TenantLabel, parse_tenant_label},
    template::resolve_template,
};

/// Configuration key reported when the observed host is missing.
pub const BASE_ADDRESS_KEY: &str = "HostEnvironment:BaseAddress";

/// Receives the resolved endpoints, typically the outbound authentication
/// provider and the default API client.
pub trait EndpointConsumer {
    fn configure_authority(&mut self, authority: &str);

    fn configure_api_base_url(&mut self, base_url: &str);
}

/// Endpoints resolved for one observed host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoints {
    pub tenant: Option<TenantLabel>,
    pub authority: String,
    pub api_base_url: String,
}

impl ResolvedEndpoints {
    pub fn apply_to<C: EndpointConsumer>(&self, consumer: &mut C) {
        consumer.configure_authority(&self.authority);
        consumer.configure_api_base_url(&self.api_base_url);
    }
}

/// Resolves the authority URL for an observed host.
///
/// ```rust
/// use sekisho_core::endpoint::resolve_authority;
///
/// let authority = resolve_authority("https://acme.example.com", "https://{0}.example.com/").unwrap();
/// assert_eq!(authority, "https://acme.example.com/");
/// ```
pub fn resolve_authority(observed_host: &str, authority_template: &str) -> Result<String, Error> {
    resolve_with_key(observed_host, authority_template, AUTHORITY_KEY)
}

/// Resolves the API base URL for an observed host.
pub fn resolve_api_base(observed_host: &str, api_template: &str) -> Result<String, Error> {
    resolve_with_key(observed_host, api_template, API_BASE_URL_KEY)
}

fn resolve_with_key(observed_host: &str, template: &str, key: &str) -> Result<String, Error> {
    let observed_host = require_host(observed_host)?;
    let template = require_value(template, key)?;
    let label = parse_tenant_label(observed_host);
    Ok(resolve_template(template, label.as_ref()))
}

fn require_host(observed_host: &str) -> Result<&str, ConfigurationError> {
    require_value(observed_host, BASE_ADDRESS_KEY)
}

fn require_value<'a>(value: &'a str, key: &str) -> Result<&'a str, ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::Missing {
            key: key.to_string(),
        });
    }
    Ok(value)
}

/// Resolves both endpoints once and caches them for the process lifetime.
///
/// Later calls return the cached value regardless of the host they pass.
pub struct EndpointResolver {
    config: EndpointConfig,
    resolved: OnceLock<ResolvedEndpoints>,
}

impl EndpointResolver {
    pub fn new(config: EndpointConfig) -> Self {
        Self {
            config,
            resolved: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Returns the cached endpoints, if [`resolve`](Self::resolve) has succeeded.
    pub fn resolved(&self) -> Option<&ResolvedEndpoints> {
        self.resolved.get()
    }

    pub fn resolve(&self, observed_host: &str) -> Result<&ResolvedEndpoints, Error> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }

        let endpoints = ResolvedEndpoints {
            tenant: parse_tenant_label(require_host(observed_host)?),
            authority: resolve_authority(observed_host, &self.config.authority)?,
            api_base_url: resolve_api_base(observed_host, &self.config.api_base_url)?,
        };

        tracing::info!(
            tenant = endpoints.tenant.as_ref().map(TenantLabel::segment),
            authority = %endpoints.authority,
            api_base_url = %endpoints.api_base_url,
            "Resolved client endpoints"
        );

        Ok(self.resolved.get_or_init(|| endpoints))
    }

    /// Resolves the endpoints and hands them to `consumer`.
    pub fn configure<C: EndpointConsumer>(
        &self,
        observed_host: &str,
        consumer: &mut C,
    ) -> Result<(), Error> {
        self.resolve(observed_host)?.apply_to(consumer);
        Ok(())
    }
}
