//! In-memory repositories shared by the service tests.

use crate::{
    ClientApplication, Error, NewClientApplication, NewTenant, Tenant, TenantContext, TenantId,
    error::StorageError,
    repositories::{ClientApplicationRepository, TenantRepository},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MockTenantRepository {
    pub tenants: Arc<Mutex<HashMap<TenantId, Tenant>>>,
    pub fail_lookups: bool,
}

impl MockTenantRepository {
    pub async fn insert(&self, id: &str, name: Option<&str>) -> TenantId {
        let id = TenantId::new(id).unwrap();
        let tenant = Tenant {
            id: id.clone(),
            name: name.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tenants.lock().await.insert(id.clone(), tenant);
        id
    }
}

#[async_trait]
impl TenantRepository for MockTenantRepository {
    async fn create(&self, tenant: NewTenant) -> Result<Tenant, Error> {
        let tenant = Tenant {
            id: tenant.id,
            name: tenant.name,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.tenants
            .lock()
            .await
            .insert(tenant.id.clone(), tenant.clone());
        Ok(tenant)
    }

    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, Error> {
        if self.fail_lookups {
            return Err(Error::Storage(StorageError::Connection(
                "tenant store unavailable".to_string(),
            )));
        }
        Ok(self.tenants.lock().await.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tenant>, Error> {
        Ok(self
            .tenants
            .lock()
            .await
            .values()
            .find(|t| {
                t.name
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .cloned())
    }
}

#[derive(Default)]
pub struct MockClientApplicationRepository {
    pub applications: Arc<Mutex<Vec<ClientApplication>>>,
    pub updates: AtomicUsize,
    pub seen_contexts: Arc<Mutex<Vec<TenantContext>>>,
}

impl MockClientApplicationRepository {
    pub async fn insert_shared(&self, client_id: &str, redirect_uris: &str, post_logout: &str) {
        self.applications.lock().await.push(ClientApplication {
            client_id: client_id.to_string(),
            display_name: None,
            tenant_id: None,
            redirect_uris: redirect_uris.to_string(),
            post_logout_redirect_uris: post_logout.to_string(),
            concurrency_stamp: "0".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }

    pub async fn get(&self, client_id: &str) -> Option<ClientApplication> {
        self.applications
            .lock()
            .await
            .iter()
            .find(|a| a.client_id == client_id)
            .cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientApplicationRepository for MockClientApplicationRepository {
    async fn create(
        &self,
        context: &TenantContext,
        application: NewClientApplication,
    ) -> Result<ClientApplication, Error> {
        let application = ClientApplication {
            client_id: application.client_id,
            display_name: application.display_name,
            tenant_id: context.tenant_id().cloned(),
            redirect_uris: application.redirect_uris.serialize(),
            post_logout_redirect_uris: application.post_logout_redirect_uris.serialize(),
            concurrency_stamp: "0".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.applications.lock().await.push(application.clone());
        Ok(application)
    }

    async fn find_by_client_id(
        &self,
        context: &TenantContext,
        client_id: &str,
    ) -> Result<Option<ClientApplication>, Error> {
        self.seen_contexts.lock().await.push(context.clone());
        let applications = self.applications.lock().await;
        let visible: Vec<&ClientApplication> = applications
            .iter()
            .filter(|a| a.client_id == client_id && context.can_access(a.tenant_id.as_ref()))
            .collect();
        Ok(visible
            .iter()
            .find(|a| a.tenant_id.is_some())
            .or(visible.first())
            .map(|a| (*a).clone()))
    }

    async fn update(
        &self,
        context: &TenantContext,
        application: &ClientApplication,
    ) -> Result<ClientApplication, Error> {
        self.seen_contexts.lock().await.push(context.clone());
        context.ensure_access(application.tenant_id.as_ref())?;

        let mut applications = self.applications.lock().await;
        let stored = applications
            .iter_mut()
            .find(|a| a.client_id == application.client_id && a.tenant_id == application.tenant_id)
            .ok_or(Error::Storage(StorageError::NotFound))?;

        if stored.concurrency_stamp != application.concurrency_stamp {
            return Err(Error::Storage(StorageError::Conflict(format!(
                "client application '{}' was modified concurrently",
                application.client_id
            ))));
        }

        let next_stamp = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
        stored.redirect_uris = application.redirect_uris.clone();
        stored.post_logout_redirect_uris = application.post_logout_redirect_uris.clone();
        stored.concurrency_stamp = next_stamp.to_string();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}
