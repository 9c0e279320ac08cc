//! SQLite storage backend for sekisho.
//!
//! ```rust,no_run
//! use sekisho_storage_sqlite::SqliteStorage;
//!
//! # async fn example() -> Result<(), sekisho_core::Error> {
//! let storage = SqliteStorage::connect("sqlite://sekisho.db?mode=rwc").await?;
//! storage.migrate().await?;
//! let provider = storage.into_repository_provider();
//! # Ok(())
//! # }
//! ```

pub mod migrations;
mod repositories;

pub use repositories::{
    SqliteClientApplicationRepository, SqliteRepositoryProvider, SqliteTenantRepository,
};

use chrono::{DateTime, Utc};
use sekisho_core::{
    ClientApplication, Error, Tenant, TenantId,
    error::{StorageError, utilities::DatabaseResultExt},
};
use sekisho_migration::MigrationManager;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use migrations::SqliteMigrationManager;

#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the database file if needed.
    ///
    /// In-memory databases are limited to a single connection so every query
    /// sees the same database.
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to database");
                StorageError::Connection(e.to_string())
            })?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        let manager = SqliteMigrationManager::new(self.pool.clone());
        manager.initialize().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to initialize migrations");
            StorageError::Migration("Failed to initialize migrations".to_string())
        })?;

        manager.up(&migrations::all()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            StorageError::Migration("Failed to run migrations".to_string())
        })?;

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_db_err()?;
        Ok(())
    }

    pub fn into_repository_provider(self) -> SqliteRepositoryProvider {
        SqliteRepositoryProvider::new(self.pool)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SqliteTenant {
    pub id: String,
    pub name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<SqliteTenant> for Tenant {
    fn from(tenant: SqliteTenant) -> Self {
        Tenant {
            id: TenantId::new_unchecked(tenant.id),
            name: tenant.name,
            created_at: from_timestamp(tenant.created_at),
            updated_at: from_timestamp(tenant.updated_at),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SqliteClientApplication {
    pub client_id: String,
    pub display_name: Option<String>,
    pub tenant_id: Option<String>,
    pub redirect_uris: String,
    pub post_logout_redirect_uris: String,
    pub concurrency_stamp: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<SqliteClientApplication> for ClientApplication {
    fn from(application: SqliteClientApplication) -> Self {
        ClientApplication {
            client_id: application.client_id,
            display_name: application.display_name,
            tenant_id: application.tenant_id.map(TenantId::new_unchecked),
            redirect_uris: application.redirect_uris,
            post_logout_redirect_uris: application.post_logout_redirect_uris,
            concurrency_stamp: application.concurrency_stamp,
            created_at: from_timestamp(application.created_at),
            updated_at: from_timestamp(application.updated_at),
        }
    }
}

fn from_timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sekisho_core::repositories::{RepositoryProvider, TenantRepositoryProvider};
    use sekisho_core::{NewTenant, repositories::TenantRepository};

    fn setup_test() {
        let _ = tracing_subscriber::fmt().try_init();
    }

    #[tokio::test]
    async fn test_connect_and_migrate() {
        setup_test();

        let storage = SqliteStorage::connect("sqlite::memory:").await.unwrap();
        storage.migrate().await.unwrap();
        storage.migrate().await.unwrap();
        storage.health_check().await.unwrap();

        let provider = storage.into_repository_provider();
        provider.health_check().await.unwrap();

        let tenant = provider
            .tenant()
            .create(NewTenant::new("Acme"))
            .await
            .unwrap();
        assert_eq!(tenant.name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let err = SqliteStorage::connect("postgres://localhost/db").await.unwrap_err();
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_row_conversion() {
        let application: ClientApplication = SqliteClientApplication {
            client_id: "BookStore_Blazor".to_string(),
            display_name: None,
            tenant_id: Some("t-acme".to_string()),
            redirect_uris: "[https://example.com/cb]".to_string(),
            post_logout_redirect_uris: "[]".to_string(),
            concurrency_stamp: "s1".to_string(),
            created_at: 1_700_000_000,
            updated_at: 1_700_000_060,
        }
        .into();

        assert_eq!(application.tenant_id.unwrap().as_str(), "t-acme");
        assert_eq!(application.created_at.timestamp(), 1_700_000_000);
        assert_eq!(application.updated_at.timestamp(), 1_700_000_060);
    }
}
