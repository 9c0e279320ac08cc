//! # Sekisho
//!
//! Sekisho makes a single OAuth front-end client work for every tenant of a
//! multi-tenant SaaS deployment where each tenant is served from its own
//! subdomain (`acme.example.com`).
//!
//! It covers both sides of the problem:
//!
//! - **Front end**: [`EndpointResolver`] derives the tenant-specific identity
//!   provider authority and API base URL from the host the client was loaded
//!   from.
//! - **Identity server**: [`Sekisho::provision_tenant`] registers the tenant's
//!   sign-in and sign-out redirect URIs on the shared client application, so
//!   the identity provider accepts redirects back to the tenant subdomain.
//!
//! ## Storage Support
//!
//! Sekisho currently supports the following storage backends:
//! - SQLite
//!
//! Other backends can implement [`RepositoryProvider`] and be passed to
//! [`SekishoBuilder::with_repositories`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use sekisho::{DataSeedContext, SekishoBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sekisho = SekishoBuilder::new()
//!         .with_sqlite("sqlite::memory:")
//!         .await?
//!         .apply_migrations(true)
//!         .build()
//!         .await?;
//!
//!     sekisho.seed(&DataSeedContext::host()).await?;
//!     let tenant = sekisho.create_tenant("Acme").await?;
//!     sekisho.provision_tenant(&tenant.id).await?;
//!
//!     Ok(())
//! }
//! ```
use std::sync::Arc;

use sekisho_core::{
    TenantContext,
    repositories::{
        ClientApplicationRepository, ClientApplicationRepositoryAdapter,
        TenantRepositoryAdapter,
    },
    services::{DomainTenantResolver, SeedingService, TenantService},
};

mod builder;

pub use builder::{NoStorage, SekishoBuilder, SekishoBuilderError, WithStorage};

/// Re-export core types from sekisho_core
///
/// These types are commonly used when working with the Sekisho API.
pub use sekisho_core::{
    ClientApplication, ClientSeedConfig, DataSeedContext, DomainTenantConfig, EndpointConfig,
    EndpointConsumer, EndpointResolver, ProvisionOutcome, RedirectUriSet, RepositoryProvider,
    ResolvedEndpoints, SkipReason, Tenant, TenantId, TenantLabel, WildcardDomainMatcher,
    services::SeedReport,
};

/// Re-export storage backends
///
/// These storage implementations are available when the corresponding feature is enabled.
#[cfg(feature = "sqlite")]
pub use sekisho_storage_sqlite::{SqliteRepositoryProvider, SqliteStorage};

/// Errors that can occur when using Sekisho.
#[derive(Debug, thiserror::Error)]
pub enum SekishoError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Error resolving or accessing a tenant
    #[error("Tenant error: {0}")]
    TenantError(String),
    /// Error while provisioning a client application
    #[error("Provisioning error: {0}")]
    ProvisioningError(String),
    /// Invalid input
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// The client application changed between read and write; retry the operation
    #[error("Concurrency conflict: {0}")]
    Conflict(String),
    /// Error when interacting with storage
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<sekisho_core::Error> for SekishoError {
    fn from(error: sekisho_core::Error) -> Self {
        use sekisho_core::{Error, error::StorageError};

        match error {
            Error::Configuration(e) => SekishoError::ConfigurationError(e.to_string()),
            Error::Tenant(e) => SekishoError::TenantError(e.to_string()),
            Error::Provisioning(e) => SekishoError::ProvisioningError(e.to_string()),
            Error::Validation(e) => SekishoError::ValidationError(e.to_string()),
            Error::Storage(StorageError::Conflict(message)) => SekishoError::Conflict(message),
            Error::Storage(e) => SekishoError::StorageError(e.to_string()),
        }
    }
}

type Tenants<R> = TenantRepositoryAdapter<R>;
type Clients<R> = ClientApplicationRepositoryAdapter<R>;

/// The main entry point for tenant endpoint provisioning.
///
/// `Sekisho` wires the tenant and client application services to a storage
/// backend. Build one with [`SekishoBuilder`] or [`Sekisho::new`].
pub struct Sekisho<R: RepositoryProvider> {
    repositories: Arc<R>,
    clients: Arc<Clients<R>>,
    tenant_service: Arc<TenantService<Tenants<R>>>,
    seeding_service: Arc<SeedingService<Tenants<R>, Clients<R>>>,
    tenant_resolver: Option<Arc<DomainTenantResolver<Tenants<R>>>>,
    redirect_matcher: WildcardDomainMatcher,
    client_config: ClientSeedConfig,
}

impl<R: RepositoryProvider> Sekisho<R> {
    /// Create a new instance with the default client configuration and no
    /// domain tenancy settings.
    pub fn new(repositories: Arc<R>) -> Self {
        let tenants = Arc::new(TenantRepositoryAdapter::new(repositories.clone()));
        let clients = Arc::new(ClientApplicationRepositoryAdapter::new(repositories.clone()));
        let client_config = ClientSeedConfig::default();

        Self {
            repositories,
            tenant_service: Arc::new(TenantService::new(tenants.clone())),
            seeding_service: Arc::new(SeedingService::new(
                tenants,
                clients.clone(),
                client_config.clone(),
            )),
            clients,
            tenant_resolver: None,
            redirect_matcher: WildcardDomainMatcher::default(),
            client_config,
        }
    }

    pub(crate) fn from_builder(
        repositories: Arc<R>,
        client_config: ClientSeedConfig,
        domain_config: Option<DomainTenantConfig>,
    ) -> Result<Self, SekishoBuilderError> {
        let mut sekisho = Self::new(repositories).with_client_config(client_config);

        if let Some(config) = domain_config {
            let tenants = Arc::new(TenantRepositoryAdapter::new(sekisho.repositories.clone()));
            let resolver = DomainTenantResolver::new(tenants, &config.self_url_with_subdomain)
                .map_err(|e| SekishoBuilderError::InvalidConfiguration(e.to_string()))?;
            sekisho.tenant_resolver = Some(Arc::new(resolver));
            sekisho.redirect_matcher = WildcardDomainMatcher::new(config.wildcard_redirect_formats())
                .map_err(|e| SekishoBuilderError::InvalidConfiguration(e.to_string()))?;
        }

        Ok(sekisho)
    }

    /// Replace the configuration of the shared client application.
    pub fn with_client_config(mut self, config: ClientSeedConfig) -> Self {
        let tenants = Arc::new(TenantRepositoryAdapter::new(self.repositories.clone()));
        self.seeding_service = Arc::new(SeedingService::new(
            tenants,
            self.clients.clone(),
            config.clone(),
        ));
        self.client_config = config;
        self
    }

    pub fn client_config(&self) -> &ClientSeedConfig {
        &self.client_config
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), SekishoError> {
        Ok(self.repositories.migrate().await?)
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), SekishoError> {
        Ok(self.repositories.health_check().await?)
    }

    /// Create a tenant. The name becomes its subdomain label in lower case.
    pub async fn create_tenant(&self, name: &str) -> Result<Tenant, SekishoError> {
        Ok(self.tenant_service.create_tenant(name).await?)
    }

    pub async fn get_tenant(&self, tenant_id: &TenantId) -> Result<Option<Tenant>, SekishoError> {
        Ok(self.tenant_service.get_tenant(tenant_id).await?)
    }

    /// Run the data seed for `context`.
    ///
    /// The shared client application is created if it does not exist. For a
    /// tenant context the client is then provisioned for that tenant.
    pub async fn seed(&self, context: &DataSeedContext) -> Result<SeedReport, SekishoError> {
        Ok(self.seeding_service.seed(context).await?)
    }

    /// Register the tenant-specific redirect URIs on the shared client application.
    ///
    /// Safe to repeat. Returns [`SekishoError::Conflict`] if another writer
    /// updated the client concurrently; retrying is safe.
    pub async fn provision_tenant(
        &self,
        tenant_id: &TenantId,
    ) -> Result<ProvisionOutcome, SekishoError> {
        Ok(self.seeding_service.provisioner().provision(tenant_id).await?)
    }

    /// Resolve the tenant addressed by a request host.
    ///
    /// Requires domain tenancy settings, see [`SekishoBuilder::with_domain_config`].
    pub async fn resolve_tenant(&self, host: &str) -> Result<TenantContext, SekishoError> {
        let resolver = self.tenant_resolver.as_ref().ok_or_else(|| {
            SekishoError::ConfigurationError(format!(
                "domain tenancy is not configured ({})",
                sekisho_core::config::SELF_URL_WITH_SUBDOMAIN_KEY
            ))
        })?;
        Ok(resolver.resolve(host).await?)
    }

    /// Whether the identity provider should accept `uri` as a redirect target
    /// for the shared client.
    ///
    /// A URI is accepted when it is registered on the client application or
    /// matches one of the wildcard subdomain formats.
    pub async fn is_redirect_uri_allowed(&self, uri: &str) -> Result<bool, SekishoError> {
        if self.redirect_matcher.is_match(uri) {
            return Ok(true);
        }

        let Some(application) = self
            .clients
            .find_by_client_id(&TenantContext::host(), &self.client_config.client_id)
            .await?
        else {
            return Ok(false);
        };

        let redirect_uris = application
            .redirect_uri_set()
            .map_err(sekisho_core::Error::from)?;
        let post_logout_redirect_uris = application
            .post_logout_redirect_uri_set()
            .map_err(sekisho_core::Error::from)?;
        Ok(redirect_uris.contains(uri) || post_logout_redirect_uris.contains(uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sekisho_core::error::{ConfigurationError, StorageError};

    #[test]
    fn test_error_mapping() {
        let conflict: SekishoError =
            sekisho_core::Error::Storage(StorageError::Conflict("stale".to_string())).into();
        assert!(matches!(conflict, SekishoError::Conflict(_)));

        let storage: SekishoError = sekisho_core::Error::Storage(StorageError::NotFound).into();
        assert!(matches!(storage, SekishoError::StorageError(_)));

        let config: SekishoError = sekisho_core::Error::Configuration(ConfigurationError::Missing {
            key: "App:FrontEndUrl".to_string(),
        })
        .into();
        assert_eq!(
            config.to_string(),
            "Configuration error: Missing required configuration value 'App:FrontEndUrl'"
        );
    }
}
