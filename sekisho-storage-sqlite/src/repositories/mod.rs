//! Repository implementations for SQLite storage

pub mod client;
pub mod tenant;

pub use client::SqliteClientApplicationRepository;
pub use tenant::SqliteTenantRepository;

use async_trait::async_trait;
use sekisho_core::{
    Error,
    error::utilities::DatabaseResultExt,
    repositories::{
        ClientApplicationRepositoryProvider, RepositoryProvider, TenantRepositoryProvider,
    },
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::SqliteStorage;

/// Repository provider implementation for SQLite
///
/// This struct implements all the individual repository provider traits
/// as well as the unified `RepositoryProvider` trait.
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    tenant: Arc<SqliteTenantRepository>,
    client_application: Arc<SqliteClientApplicationRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let tenant = Arc::new(SqliteTenantRepository::new(pool.clone()));
        let client_application = Arc::new(SqliteClientApplicationRepository::new(pool.clone()));

        Self {
            pool,
            tenant,
            client_application,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl TenantRepositoryProvider for SqliteRepositoryProvider {
    type TenantRepo = SqliteTenantRepository;

    fn tenant(&self) -> &Self::TenantRepo {
        &self.tenant
    }
}

impl ClientApplicationRepositoryProvider for SqliteRepositoryProvider {
    type ClientApplicationRepo = SqliteClientApplicationRepository;

    fn client_application(&self) -> &Self::ClientApplicationRepo {
        &self.client_application
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        SqliteStorage::new(self.pool.clone()).migrate().await
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_db_err()?;
        Ok(())
    }
}
