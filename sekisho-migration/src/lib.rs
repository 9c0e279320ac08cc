//! Versioned schema migrations shared by the sekisho storage backends.
//!
//! A backend defines one [`Migration`] per schema step and a
//! [`MigrationManager`] that records applied versions in its own table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Database;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Migration(String),
    #[error("Migration versions must be strictly increasing: {previous} is followed by {next}")]
    OutOfOrder { previous: i64, next: i64 },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<MigrationError> for sekisho_core::Error {
    fn from(error: MigrationError) -> Self {
        sekisho_core::error::StorageError::Migration(error.to_string()).into()
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;

#[async_trait]
pub trait Migration<DB: Database>: Send + Sync {
    /// Execute the migration
    async fn up<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Rollback the migration
    async fn down<'a>(&'a self, conn: &'a mut <DB as Database>::Connection) -> Result<()>;

    /// Unique version number for ordering migrations
    fn version(&self) -> i64;

    /// Human readable name of the migration
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    /// Unix timestamp in seconds.
    pub applied_at: i64,
}

impl MigrationRecord {
    pub fn applied_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.applied_at, 0)
    }
}

/// Checks that `migrations` is sorted by strictly increasing version.
pub fn validate_order<DB: Database>(migrations: &[Box<dyn Migration<DB>>]) -> Result<()> {
    for pair in migrations.windows(2) {
        let (previous, next) = (pair[0].version(), pair[1].version());
        if next <= previous {
            tracing::error!(previous, next, "Migration list is out of order");
            return Err(MigrationError::OutOfOrder { previous, next });
        }
    }
    Ok(())
}

#[async_trait]
pub trait MigrationManager<DB: Database>: Send + Sync {
    fn get_migration_table_name(&self) -> &str {
        "_sekisho_migrations"
    }

    /// Initialize migration tracking table
    async fn initialize(&self) -> Result<()>;

    /// Apply pending migrations in order
    async fn up(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    /// Roll back applied migrations, newest first
    async fn down(&self, migrations: &[Box<dyn Migration<DB>>]) -> Result<()>;

    /// Get list of applied migrations
    async fn get_applied_migrations(&self) -> Result<Vec<MigrationRecord>>;

    /// Check if specific migration was applied
    async fn is_applied(&self, version: i64) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Any;

    struct Step(i64);

    #[async_trait]
    impl Migration<Any> for Step {
        async fn up<'a>(&'a self, _conn: &'a mut <Any as Database>::Connection) -> Result<()> {
            Ok(())
        }

        async fn down<'a>(&'a self, _conn: &'a mut <Any as Database>::Connection) -> Result<()> {
            Ok(())
        }

        fn version(&self) -> i64 {
            self.0
        }

        fn name(&self) -> &str {
            "Step"
        }
    }

    fn steps(versions: &[i64]) -> Vec<Box<dyn Migration<Any>>> {
        versions
            .iter()
            .map(|v| Box::new(Step(*v)) as Box<dyn Migration<Any>>)
            .collect()
    }

    #[test]
    fn test_validate_order() {
        assert!(validate_order(&steps(&[])).is_ok());
        assert!(validate_order(&steps(&[1, 2, 5])).is_ok());
        assert!(matches!(
            validate_order(&steps(&[1, 3, 2])),
            Err(MigrationError::OutOfOrder { previous: 3, next: 2 })
        ));
        assert!(matches!(
            validate_order(&steps(&[1, 1])),
            Err(MigrationError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn test_record_timestamp() {
        let record = MigrationRecord {
            version: 1,
            name: "CreateTenantsTable".to_string(),
            applied_at: 1_700_000_000,
        };
        assert_eq!(record.applied_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_into_core_error() {
        let error: sekisho_core::Error = MigrationError::Migration("boom".to_string()).into();
        assert!(error.is_storage_error());
    }
}
