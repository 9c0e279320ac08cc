use crate::SqliteTenant;
use async_trait::async_trait;
use sekisho_core::{
    Error, NewTenant, Tenant, TenantId,
    error::{StorageError, utilities::DatabaseResultExt},
    repositories::TenantRepository,
};
use sqlx::SqlitePool;

pub struct SqliteTenantRepository {
    pool: SqlitePool,
}

impl SqliteTenantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for SqliteTenantRepository {
    async fn create(&self, tenant: NewTenant) -> Result<Tenant, Error> {
        let now = chrono::Utc::now().timestamp();

        let sqlite_tenant = sqlx::query_as::<_, SqliteTenant>(
            r#"
            INSERT INTO tenants (id, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(tenant.id.as_str())
        .bind(&tenant.name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => Error::Storage(StorageError::Constraint(
                format!("tenant '{}' conflicts with an existing tenant: {db}", tenant.id),
            )),
            _ => Error::Storage(StorageError::Database(e.to_string())),
        })?;

        Ok(sqlite_tenant.into())
    }

    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, Error> {
        let sqlite_tenant = sqlx::query_as::<_, SqliteTenant>(
            "SELECT id, name, created_at, updated_at FROM tenants WHERE id = ?1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to find tenant")?;

        Ok(sqlite_tenant.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tenant>, Error> {
        let sqlite_tenant = sqlx::query_as::<_, SqliteTenant>(
            "SELECT id, name, created_at, updated_at FROM tenants WHERE name = ?1 COLLATE NOCASE",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to find tenant by name")?;

        Ok(sqlite_tenant.map(Into::into))
    }
}
