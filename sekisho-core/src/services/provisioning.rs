use crate::{
    ClientApplication, Error, TenantContext, TenantId,
    client::{POST_LOGOUT_REDIRECT_URIS_FIELD, REDIRECT_URIS_FIELD},
    error::{ProvisioningError, ValidationError},
    redirect_uris::{RedirectUriSet, derive_tenant_uri},
    repositories::{ClientApplicationRepository, TenantRepository},
};
use std::sync::Arc;

/// Why provisioning did nothing for a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TenantNotFound,
    TenantUnnamed,
}

/// Result of provisioning one tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The tenant cannot be addressed by subdomain; nothing was read or written.
    Skipped(SkipReason),
    /// Both tenant-specific URIs were already registered.
    Unchanged,
    /// The client record was written back. Each field holds the URI that was
    /// added to that list, if any.
    Updated {
        redirect_uri: Option<String>,
        post_logout_redirect_uri: Option<String>,
    },
}

impl ProvisionOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, ProvisionOutcome::Updated { .. })
    }
}

/// Extends the shared OAuth client's redirect URI allow-lists with the
/// tenant-specific variants of their canonical entries.
pub struct TenantClientProvisioner<T: TenantRepository, C: ClientApplicationRepository> {
    tenant_repository: Arc<T>,
    client_repository: Arc<C>,
    client_id: String,
}

impl<T: TenantRepository, C: ClientApplicationRepository> TenantClientProvisioner<T, C> {
    pub fn new(tenant_repository: Arc<T>, client_repository: Arc<C>, client_id: impl Into<String>) -> Self {
        Self {
            tenant_repository,
            client_repository,
            client_id: client_id.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Provision the client application for one tenant.
    ///
    /// Idempotent: a second run for the same tenant finds both URIs present and
    /// writes nothing. Missing or unnamed tenants are skipped. A name that cannot
    /// be stored in the encoded lists is a validation error. A missing client
    /// record, a malformed stored list, a storage failure or a concurrent
    /// modification is returned as an error without any partial write; retrying
    /// is left to the caller.
    #[tracing::instrument(skip(self), fields(client_id = %self.client_id), err)]
    pub async fn provision(&self, tenant_id: &TenantId) -> Result<ProvisionOutcome, Error> {
        let Some(tenant) = self.tenant_repository.find_by_id(tenant_id).await? else {
            tracing::warn!("Tenant not found, skipping client provisioning");
            return Ok(ProvisionOutcome::Skipped(SkipReason::TenantNotFound));
        };

        let Some(label) = tenant.subdomain_label() else {
            tracing::warn!("Tenant has no name, skipping client provisioning");
            return Ok(ProvisionOutcome::Skipped(SkipReason::TenantUnnamed));
        };

        // The stored lists have no escaping; such a label would split on read-back.
        if label.contains(',') || label.chars().any(char::is_whitespace) {
            tracing::error!(label = %label, "Tenant name cannot be used as a subdomain label");
            return Err(ValidationError::InvalidName(format!(
                "tenant name '{label}' cannot be used as a subdomain label"
            ))
            .into());
        }

        let context = TenantContext::new(tenant_id.clone());
        let mut application = self
            .client_repository
            .find_by_client_id(&context, &self.client_id)
            .await?
            .ok_or_else(|| ProvisioningError::ClientApplicationNotFound {
                client_id: self.client_id.clone(),
            })?;

        // Decode both lists before touching either so a malformed one aborts cleanly.
        let mut redirect_uris = application.redirect_uri_set()?;
        let mut post_logout_redirect_uris = application.post_logout_redirect_uri_set()?;

        let redirect_uri = append_tenant_uri(&mut redirect_uris, &label, REDIRECT_URIS_FIELD);
        let post_logout_redirect_uri = append_tenant_uri(
            &mut post_logout_redirect_uris,
            &label,
            POST_LOGOUT_REDIRECT_URIS_FIELD,
        );

        if redirect_uri.is_none() && post_logout_redirect_uri.is_none() {
            tracing::debug!(label = %label, "Tenant redirect URIs already registered");
            return Ok(ProvisionOutcome::Unchanged);
        }

        if redirect_uri.is_some() {
            application.redirect_uris = redirect_uris.serialize();
            tracing::info!(field = REDIRECT_URIS_FIELD, value = %application.redirect_uris, "Extended redirect URIs");
        }
        if post_logout_redirect_uri.is_some() {
            application.post_logout_redirect_uris = post_logout_redirect_uris.serialize();
            tracing::info!(
                field = POST_LOGOUT_REDIRECT_URIS_FIELD,
                value = %application.post_logout_redirect_uris,
                "Extended post-logout redirect URIs"
            );
        }

        self.persist(&context, &application).await?;

        Ok(ProvisionOutcome::Updated {
            redirect_uri,
            post_logout_redirect_uri,
        })
    }

    async fn persist(
        &self,
        context: &TenantContext,
        application: &ClientApplication,
    ) -> Result<ClientApplication, Error> {
        self.client_repository.update(context, application).await
    }
}

/// Appends the tenant variant of the list's canonical entry, returning it if it
/// was not already present.
fn append_tenant_uri(set: &mut RedirectUriSet, label: &str, field: &str) -> Option<String> {
    let Some(canonical) = set.canonical() else {
        tracing::debug!(field, "List has no canonical entry to derive from");
        return None;
    };

    let tenant_uri = derive_tenant_uri(canonical, label);
    set.append_if_absent(tenant_uri.clone()).then_some(tenant_uri)
}
