use crate::{
    ClientApplication, Error, NewClientApplication, NewTenant, Tenant, TenantContext, TenantId,
    repositories::{ClientApplicationRepository, RepositoryProvider, TenantRepository},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Adapter that wraps a RepositoryProvider and implements individual repository traits
pub struct TenantRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> TenantRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> TenantRepository for TenantRepositoryAdapter<R> {
    async fn create(&self, tenant: NewTenant) -> Result<Tenant, Error> {
        self.provider.tenant().create(tenant).await
    }

    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, Error> {
        self.provider.tenant().find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tenant>, Error> {
        self.provider.tenant().find_by_name(name).await
    }
}

pub struct ClientApplicationRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> ClientApplicationRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> ClientApplicationRepository for ClientApplicationRepositoryAdapter<R> {
    async fn create(
        &self,
        context: &TenantContext,
        application: NewClientApplication,
    ) -> Result<ClientApplication, Error> {
        self.provider
            .client_application()
            .create(context, application)
            .await
    }

    async fn find_by_client_id(
        &self,
        context: &TenantContext,
        client_id: &str,
    ) -> Result<Option<ClientApplication>, Error> {
        self.provider
            .client_application()
            .find_by_client_id(context, client_id)
            .await
    }

    async fn update(
        &self,
        context: &TenantContext,
        application: &ClientApplication,
    ) -> Result<ClientApplication, Error> {
        self.provider
            .client_application()
            .update(context, application)
            .await
    }
}
