//! Core functionality for sekisho
//!
//! This crate contains the storage-independent pieces of tenant-aware identity
//! endpoints:
//!
//! - [`host`] and [`template`] turn an observed host into tenant-specific URLs.
//! - [`endpoint`] resolves a front-end's authority and API base URL at startup.
//! - [`redirect_uris`] decodes and extends the stored redirect URI lists.
//! - [`services`] provisions the shared OAuth client for new tenants.
//!
//! Storage backends implement the traits in [`repositories`]; see
//! `sekisho-storage-sqlite` for the bundled one.
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod host;
pub mod pattern;
pub mod redirect_uris;
pub mod repositories;
pub mod services;
pub mod template;
pub mod tenant;

pub use client::{ClientApplication, NewClientApplication};
pub use config::{ClientSeedConfig, DomainTenantConfig, EndpointConfig};
pub use endpoint::{EndpointConsumer, EndpointResolver, ResolvedEndpoints};
pub use error::{Error, TenantError};
pub use host::TenantLabel;
pub use pattern::WildcardDomainMatcher;
pub use redirect_uris::RedirectUriSet;
pub use repositories::RepositoryProvider;
pub use services::{DataSeedContext, ProvisionOutcome, SkipReason};
pub use tenant::{NewTenant, Tenant, TenantContext, TenantId};
