//! Repository traits for data access layer
//!
//! This module defines the repository interfaces that services use to interact with storage.
//!
//! # Trait Hierarchy
//!
//! - Individual `*Repository` traits define the operations for each data domain
//! - Individual `*RepositoryProvider` traits provide access to each repository type
//! - [`RepositoryProvider`] is a supertrait combining all provider traits plus lifecycle methods

pub mod adapter;
pub mod client;
pub mod tenant;

pub use adapter::{ClientApplicationRepositoryAdapter, TenantRepositoryAdapter};
pub use client::ClientApplicationRepository;
pub use tenant::TenantRepository;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for tenant repository access.
pub trait TenantRepositoryProvider: Send + Sync + 'static {
    /// The tenant repository implementation type
    type TenantRepo: TenantRepository;

    /// Get the tenant repository
    fn tenant(&self) -> &Self::TenantRepo;
}

/// Provider trait for client application repository access.
pub trait ClientApplicationRepositoryProvider: Send + Sync + 'static {
    /// The client application repository implementation type
    type ClientApplicationRepo: ClientApplicationRepository;

    /// Get the client application repository
    fn client_application(&self) -> &Self::ClientApplicationRepo;
}

/// Provider trait that storage implementations must implement to provide all repositories.
///
/// # Example
///
/// ```rust,ignore
/// use sekisho_core::repositories::*;
///
/// struct MyStorage { /* ... */ }
///
/// impl TenantRepositoryProvider for MyStorage {
///     type TenantRepo = MyTenantRepository;
///     fn tenant(&self) -> &Self::TenantRepo { &self.tenant_repo }
/// }
///
/// // ... implement ClientApplicationRepositoryProvider ...
///
/// #[async_trait]
/// impl RepositoryProvider for MyStorage {
///     async fn migrate(&self) -> Result<(), Error> { /* ... */ }
///     async fn health_check(&self) -> Result<(), Error> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: TenantRepositoryProvider + ClientApplicationRepositoryProvider {
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
