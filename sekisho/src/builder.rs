//! Builder pattern for constructing Sekisho instances
//!
//! This module provides a type-safe builder for creating [`Sekisho`] instances with
//! compile-time validation of storage configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! use sekisho::{ClientSeedConfig, DomainTenantConfig, SekishoBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sekisho = SekishoBuilder::new()
//!         .with_sqlite("sqlite://sekisho.db")
//!         .await?
//!         .with_client_config(ClientSeedConfig::default().with_root_url("https://example.com"))
//!         .with_domain_config(DomainTenantConfig::new(
//!             "https://{0}.api.example.com",
//!             "https://{0}.example.com",
//!         ))
//!         .apply_migrations(true)
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use sekisho_core::{ClientSeedConfig, DomainTenantConfig, RepositoryProvider};

use crate::Sekisho;

/// Errors that can occur when building a Sekisho instance.
#[derive(Debug, thiserror::Error)]
pub enum SekishoBuilderError {
    /// Failed to connect to storage backend
    #[error("Storage connection failed: {0}")]
    StorageConnection(String),

    /// Failed to run database migrations
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Marker type indicating no storage has been configured yet.
///
/// This is the initial state of [`SekishoBuilder`].
pub struct NoStorage;

/// Marker type indicating storage has been configured.
pub struct WithStorage<R: RepositoryProvider> {
    repositories: Arc<R>,
}

/// A type-safe builder for constructing [`Sekisho`] instances.
///
/// # Type States
///
/// - [`NoStorage`]: Initial state, storage must be configured
/// - [`WithStorage<R>`]: Storage configured, ready to build or add more configuration
pub struct SekishoBuilder<Storage> {
    storage: Storage,
    client_config: ClientSeedConfig,
    domain_config: Option<DomainTenantConfig>,
    apply_migrations: bool,
}

impl Default for SekishoBuilder<NoStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl SekishoBuilder<NoStorage> {
    /// Create a new builder with default configuration.
    ///
    /// # Defaults
    ///
    /// - Client application: [`ClientSeedConfig::default`]
    /// - Domain tenancy: not configured
    /// - Apply migrations: false
    pub fn new() -> Self {
        Self {
            storage: NoStorage,
            client_config: ClientSeedConfig::default(),
            domain_config: None,
            apply_migrations: false,
        }
    }

    /// Use an existing repository provider.
    pub fn with_repositories<R: RepositoryProvider>(
        self,
        repositories: Arc<R>,
    ) -> SekishoBuilder<WithStorage<R>> {
        SekishoBuilder {
            storage: WithStorage { repositories },
            client_config: self.client_config,
            domain_config: self.domain_config,
            apply_migrations: self.apply_migrations,
        }
    }
}

#[cfg(feature = "sqlite")]
impl SekishoBuilder<NoStorage> {
    /// Configure SQLite storage by connecting to the given URL.
    ///
    /// # Arguments
    ///
    /// * `url` - SQLite connection URL (e.g., "sqlite::memory:" or "sqlite://path/to/db.sqlite")
    pub async fn with_sqlite(
        self,
        url: &str,
    ) -> Result<SekishoBuilder<WithStorage<crate::SqliteRepositoryProvider>>, SekishoBuilderError>
    {
        let storage = crate::SqliteStorage::connect(url)
            .await
            .map_err(|e| SekishoBuilderError::StorageConnection(e.to_string()))?;

        Ok(self.with_repositories(Arc::new(storage.into_repository_provider())))
    }

    /// Configure SQLite storage from an existing connection pool.
    pub fn with_sqlite_pool(
        self,
        pool: sqlx::SqlitePool,
    ) -> SekishoBuilder<WithStorage<crate::SqliteRepositoryProvider>> {
        self.with_repositories(Arc::new(crate::SqliteRepositoryProvider::new(pool)))
    }
}

impl<R: RepositoryProvider> SekishoBuilder<WithStorage<R>> {
    /// Configure the shared front-end client application.
    pub fn with_client_config(mut self, config: ClientSeedConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Enable host-based tenant resolution and wildcard redirect URI matching.
    pub fn with_domain_config(mut self, config: DomainTenantConfig) -> Self {
        self.domain_config = Some(config);
        self
    }

    /// Run migrations when [`build`](Self::build) is called.
    pub fn apply_migrations(mut self, apply: bool) -> Self {
        self.apply_migrations = apply;
        self
    }

    /// Build the Sekisho instance.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail or the domain configuration
    /// contains an invalid URL template.
    pub async fn build(self) -> Result<Sekisho<R>, SekishoBuilderError> {
        if self.apply_migrations {
            self.storage
                .repositories
                .migrate()
                .await
                .map_err(|e| SekishoBuilderError::Migration(e.to_string()))?;
        }

        Sekisho::from_builder(
            self.storage.repositories,
            self.client_config,
            self.domain_config,
        )
    }
}
