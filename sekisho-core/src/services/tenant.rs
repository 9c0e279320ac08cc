use crate::{
    Error, NewTenant, Tenant, TenantContext, TenantError, TenantId,
    error::ValidationError,
    host::strip_protocol,
    pattern::{SubdomainPattern, is_subdomain_label},
    repositories::TenantRepository,
};
use std::sync::Arc;

/// Service for tenant management operations
pub struct TenantService<R: TenantRepository> {
    repository: Arc<R>,
}

impl<R: TenantRepository> TenantService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a tenant with a fresh random ID
    pub async fn create_tenant(&self, name: &str) -> Result<Tenant, Error> {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidName("tenant name cannot be blank".to_string()).into());
        }
        if !is_subdomain_label(name) {
            return Err(ValidationError::InvalidName(format!(
                "tenant name '{name}' cannot be used as a subdomain label"
            ))
            .into());
        }
        if self.repository.find_by_name(name).await?.is_some() {
            return Err(ValidationError::InvalidName(format!("tenant '{name}' already exists")).into());
        }

        let tenant = self.repository.create(NewTenant::new(name)).await?;
        tracing::info!(tenant_id = %tenant.id, name, "Created tenant");
        Ok(tenant)
    }

    pub async fn get_tenant(&self, id: &TenantId) -> Result<Option<Tenant>, Error> {
        self.repository.find_by_id(id).await
    }

    pub async fn get_tenant_by_name(&self, name: &str) -> Result<Option<Tenant>, Error> {
        self.repository.find_by_name(name).await
    }
}

/// Resolves the current tenant from the request host using a URL template
/// such as `https://{0}.api.example.com`.
pub struct DomainTenantResolver<R: TenantRepository> {
    repository: Arc<R>,
    pattern: SubdomainPattern,
}

impl<R: TenantRepository> DomainTenantResolver<R> {
    pub fn new(repository: Arc<R>, self_url_with_subdomain: &str) -> Result<Self, Error> {
        let pattern = SubdomainPattern::new(normalize(self_url_with_subdomain))?;
        Ok(Self {
            repository,
            pattern,
        })
    }

    /// Extracts the tenant name addressed by `host`, if any.
    pub fn tenant_name<'a>(&self, host: &'a str) -> Option<&'a str> {
        self.pattern.capture(normalize(host))
    }

    /// Resolves `host` to a tenant context.
    ///
    /// Hosts that do not carry a tenant label resolve to the host context. A
    /// label naming an unknown tenant is an error.
    #[tracing::instrument(skip(self), err)]
    pub async fn resolve(&self, host: &str) -> Result<TenantContext, Error> {
        let Some(name) = self.tenant_name(host) else {
            return Ok(TenantContext::host());
        };

        let tenant = self
            .repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| TenantError::TenantNotFound {
                id: name.to_string(),
            })?;

        tracing::debug!(tenant_id = %tenant.id, "Resolved tenant from host");
        Ok(TenantContext::new(tenant.id))
    }
}

fn normalize(url: &str) -> &str {
    strip_protocol(url.trim()).trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockTenantRepository;

    #[tokio::test]
    async fn test_create_tenant() {
        let repository = Arc::new(MockTenantRepository::default());
        let service = TenantService::new(repository.clone());

        let tenant = service.create_tenant("Acme").await.unwrap();
        assert_eq!(tenant.name.as_deref(), Some("Acme"));
        assert_eq!(
            service.get_tenant(&tenant.id).await.unwrap().unwrap().id,
            tenant.id
        );
    }

    #[tokio::test]
    async fn test_create_tenant_rejects_bad_names() {
        let service = TenantService::new(Arc::new(MockTenantRepository::default()));

        for name in ["", "  ", "acme.corp", "a/b", "a,b", "Acme Corp", " acme"] {
            let err = service.create_tenant(name).await.unwrap_err();
            assert!(err.is_validation_error(), "{name:?} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_create_tenant_rejects_duplicate_names() {
        let service = TenantService::new(Arc::new(MockTenantRepository::default()));
        service.create_tenant("Acme").await.unwrap();

        let err = service.create_tenant("acme").await.unwrap_err();
        assert!(err.is_validation_error());
    }

    #[tokio::test]
    async fn test_resolve_tenant_from_host() {
        let repository = Arc::new(MockTenantRepository::default());
        let acme = repository.insert("t-acme", Some("Acme")).await;
        let resolver =
            DomainTenantResolver::new(repository, "https://{0}.api.example.com").unwrap();

        let context = resolver.resolve("https://acme.api.example.com/").await.unwrap();
        assert_eq!(context.tenant_id(), Some(&acme));

        let context = resolver.resolve("ACME.api.example.com").await.unwrap();
        assert_eq!(context.tenant_id(), Some(&acme));
    }

    #[tokio::test]
    async fn test_resolve_without_label_is_host() {
        let repository = Arc::new(MockTenantRepository::default());
        let resolver =
            DomainTenantResolver::new(repository, "https://{0}.api.example.com").unwrap();

        assert!(resolver.resolve("https://api.example.com").await.unwrap().is_host());
        assert!(resolver.resolve("https://other.com").await.unwrap().is_host());
        assert_eq!(resolver.tenant_name("a.b.api.example.com"), None);
    }

    #[tokio::test]
    async fn test_resolve_unknown_tenant() {
        let repository = Arc::new(MockTenantRepository::default());
        let resolver =
            DomainTenantResolver::new(repository, "https://{0}.api.example.com").unwrap();

        let err = resolver.resolve("https://ghost.api.example.com").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Tenant(TenantError::TenantNotFound { id }) if id == "ghost"
        ));
    }
}
