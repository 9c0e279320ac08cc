use crate::{ClientApplication, Error, NewClientApplication, TenantContext};
use async_trait::async_trait;

/// Repository for OAuth client application records.
///
/// Every call is scoped by an explicit [`TenantContext`]. A tenant context sees
/// its own records and the host-level records shared by all tenants.
#[async_trait]
pub trait ClientApplicationRepository: Send + Sync + 'static {
    /// Create a client application owned by the context's tenant, or by the
    /// host for a host context
    async fn create(
        &self,
        context: &TenantContext,
        application: NewClientApplication,
    ) -> Result<ClientApplication, Error>;

    /// Find a client application by client ID.
    ///
    /// A tenant-owned record takes precedence over a host-level one.
    async fn find_by_client_id(
        &self,
        context: &TenantContext,
        client_id: &str,
    ) -> Result<Option<ClientApplication>, Error>;

    /// Write back both redirect URI lists.
    ///
    /// Fails with `StorageError::Conflict` if the stored concurrency stamp no
    /// longer matches `application.concurrency_stamp`. Returns the record with
    /// its new stamp.
    async fn update(
        &self,
        context: &TenantContext,
        application: &ClientApplication,
    ) -> Result<ClientApplication, Error>;
}
