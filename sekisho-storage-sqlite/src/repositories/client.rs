use crate::SqliteClientApplication;
use async_trait::async_trait;
use sekisho_core::{
    ClientApplication, Error, NewClientApplication, TenantContext,
    error::{StorageError, utilities::DatabaseResultExt},
    repositories::ClientApplicationRepository,
};
use sqlx::SqlitePool;

const COLUMNS: &str = "client_id, display_name, tenant_id, redirect_uris, post_logout_redirect_uris, concurrency_stamp, created_at, updated_at";

pub struct SqliteClientApplicationRepository {
    pool: SqlitePool,
}

impl SqliteClientApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn new_concurrency_stamp() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl ClientApplicationRepository for SqliteClientApplicationRepository {
    async fn create(
        &self,
        context: &TenantContext,
        application: NewClientApplication,
    ) -> Result<ClientApplication, Error> {
        let now = chrono::Utc::now().timestamp();

        let sqlite_application = sqlx::query_as::<_, SqliteClientApplication>(&format!(
            r#"
            INSERT INTO client_applications
                (client_id, display_name, tenant_id, redirect_uris, post_logout_redirect_uris, concurrency_stamp, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&application.client_id)
        .bind(&application.display_name)
        .bind(context.tenant_id().map(|id| id.as_str()))
        .bind(application.redirect_uris.serialize())
        .bind(application.post_logout_redirect_uris.serialize())
        .bind(new_concurrency_stamp())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => Error::Storage(StorageError::Constraint(
                format!(
                    "client application '{}' already exists for {context}",
                    application.client_id
                ),
            )),
            _ => Error::Storage(StorageError::Database(e.to_string())),
        })?;

        Ok(sqlite_application.into())
    }

    async fn find_by_client_id(
        &self,
        context: &TenantContext,
        client_id: &str,
    ) -> Result<Option<ClientApplication>, Error> {
        // A tenant's own registration shadows the shared host-level one.
        let sqlite_application = sqlx::query_as::<_, SqliteClientApplication>(&format!(
            r#"
            SELECT {COLUMNS} FROM client_applications
            WHERE client_id = ?1 AND (tenant_id = ?2 OR tenant_id IS NULL)
            ORDER BY tenant_id IS NULL
            LIMIT 1
            "#
        ))
        .bind(client_id)
        .bind(context.tenant_id().map(|id| id.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to find client application")?;

        Ok(sqlite_application.map(Into::into))
    }

    async fn update(
        &self,
        context: &TenantContext,
        application: &ClientApplication,
    ) -> Result<ClientApplication, Error> {
        context.ensure_access(application.tenant_id.as_ref())?;

        let now = chrono::Utc::now().timestamp();
        let tenant_id = application.tenant_id.as_ref().map(|id| id.as_str());

        let updated = sqlx::query_as::<_, SqliteClientApplication>(&format!(
            r#"
            UPDATE client_applications
            SET display_name = ?1, redirect_uris = ?2, post_logout_redirect_uris = ?3,
                concurrency_stamp = ?4, updated_at = ?5
            WHERE client_id = ?6 AND tenant_id IS ?7 AND concurrency_stamp = ?8
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&application.display_name)
        .bind(&application.redirect_uris)
        .bind(&application.post_logout_redirect_uris)
        .bind(new_concurrency_stamp())
        .bind(now)
        .bind(&application.client_id)
        .bind(tenant_id)
        .bind(&application.concurrency_stamp)
        .fetch_optional(&self.pool)
        .await
        .map_db_err_with_context("Failed to update client application")?;

        if let Some(updated) = updated {
            return Ok(updated.into());
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM client_applications WHERE client_id = ?1 AND tenant_id IS ?2)",
        )
        .bind(&application.client_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_db_err()?;

        if exists {
            tracing::warn!(
                client_id = %application.client_id,
                "Client application was modified concurrently"
            );
            Err(Error::Storage(StorageError::Conflict(format!(
                "client application '{}' was modified since it was read",
                application.client_id
            ))))
        } else {
            Err(Error::Storage(StorageError::NotFound))
        }
    }
}
