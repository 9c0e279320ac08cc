use crate::{Error, NewTenant, Tenant, TenantId};
use async_trait::async_trait;

/// Repository for tenant records owned by the tenant-management subsystem
#[async_trait]
pub trait TenantRepository: Send + Sync + 'static {
    /// Create a new tenant
    async fn create(&self, tenant: NewTenant) -> Result<Tenant, Error>;

    /// Find a tenant by ID
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, Error>;

    /// Find a tenant by name, ignoring case
    async fn find_by_name(&self, name: &str) -> Result<Option<Tenant>, Error>;
}
