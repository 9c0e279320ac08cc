use crate::{
    ClientApplication, Error, NewClientApplication, TenantContext, TenantId,
    config::ClientSeedConfig,
    repositories::{ClientApplicationRepository, TenantRepository},
    services::provisioning::{ProvisionOutcome, TenantClientProvisioner},
};
use std::sync::Arc;

/// Identifies which partition a seed run targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSeedContext {
    pub tenant_id: Option<TenantId>,
}

impl DataSeedContext {
    pub fn host() -> Self {
        Self::default()
    }

    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
        }
    }
}

/// Creates the shared front-end client application when it does not exist yet.
pub struct ClientApplicationSeeder<C: ClientApplicationRepository> {
    repository: Arc<C>,
    config: ClientSeedConfig,
}

impl<C: ClientApplicationRepository> ClientApplicationSeeder<C> {
    pub fn new(repository: Arc<C>, config: ClientSeedConfig) -> Self {
        Self { repository, config }
    }

    /// Returns the newly created client, or `None` if it was already present.
    #[tracing::instrument(skip(self), fields(client_id = %self.config.client_id), err)]
    pub async fn seed(&self) -> Result<Option<ClientApplication>, Error> {
        let context = TenantContext::host();
        if self
            .repository
            .find_by_client_id(&context, &self.config.client_id)
            .await?
            .is_some()
        {
            tracing::debug!("Client application already exists");
            return Ok(None);
        }

        let application = NewClientApplication::builder()
            .client_id(&self.config.client_id)
            .display_name(&self.config.display_name)
            .redirect_uri(self.config.redirect_uri())
            .post_logout_redirect_uri(self.config.post_logout_redirect_uri())
            .build()?;

        let created = self.repository.create(&context, application).await?;
        tracing::info!(redirect_uris = %created.redirect_uris, "Created client application");
        Ok(Some(created))
    }
}

/// What a seed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub client_created: bool,
    pub provisioning: Option<ProvisionOutcome>,
}

/// Runs the host-level client seed followed, for tenant contexts, by tenant
/// client provisioning.
pub struct SeedingService<T: TenantRepository, C: ClientApplicationRepository> {
    seeder: ClientApplicationSeeder<C>,
    provisioner: TenantClientProvisioner<T, C>,
}

impl<T: TenantRepository, C: ClientApplicationRepository> SeedingService<T, C> {
    pub fn new(tenant_repository: Arc<T>, client_repository: Arc<C>, config: ClientSeedConfig) -> Self {
        let provisioner = TenantClientProvisioner::new(
            tenant_repository,
            client_repository.clone(),
            config.client_id.clone(),
        );
        Self {
            seeder: ClientApplicationSeeder::new(client_repository, config),
            provisioner,
        }
    }

    pub fn provisioner(&self) -> &TenantClientProvisioner<T, C> {
        &self.provisioner
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn seed(&self, context: &DataSeedContext) -> Result<SeedReport, Error> {
        let client_created = self.seeder.seed().await?.is_some();

        let provisioning = match &context.tenant_id {
            Some(tenant_id) => Some(self.provisioner.provision(tenant_id).await?),
            None => None,
        };

        Ok(SeedReport {
            client_created,
            provisioning,
        })
    }
}
