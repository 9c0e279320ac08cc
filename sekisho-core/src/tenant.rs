//! Tenant-related types and utilities for multi-tenancy support.
//!
//! This module provides the tenant record owned by the tenant-management
//! subsystem, the strongly-typed [`TenantId`], and the [`TenantContext`] that
//! is threaded explicitly through every tenant-scoped repository call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly-typed tenant identifier.
///
/// Tenant identifiers are opaque to this crate. They are usually UUIDs, but any
/// identifier satisfying the validation rules below is accepted.
///
/// # Validation Rules
/// - Non-empty string
/// - ASCII alphanumeric characters plus hyphens and underscores only
/// - Maximum 64 characters
/// - Case-sensitive
///
/// # Examples
///
/// ```rust
/// use sekisho_core::tenant::TenantId;
///
/// let tenant_id = TenantId::new("3a0f5c1e-acme").unwrap();
/// assert_eq!(tenant_id.as_str(), "3a0f5c1e-acme");
///
/// assert!(TenantId::new("acme.example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new `TenantId` with validation.
    ///
    /// # Errors
    /// Returns `TenantError::InvalidTenantId` if:
    /// - The ID is empty
    /// - The ID contains invalid characters
    /// - The ID exceeds 64 characters
    pub fn new(id: impl Into<String>) -> Result<Self, TenantError> {
        let id = id.into();
        Self::validate_tenant_id(&id)?;
        Ok(TenantId(id))
    }

    /// Creates a new `TenantId` without validation.
    ///
    /// Only use this for identifiers read back from trusted storage.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        TenantId(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn new_random() -> Self {
        TenantId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate_tenant_id(id: &str) -> Result<(), TenantError> {
        if id.is_empty() {
            return Err(TenantError::InvalidTenantId {
                id: id.to_string(),
                reason: "Tenant ID cannot be empty".to_string(),
            });
        }

        if id.len() > 64 {
            return Err(TenantError::InvalidTenantId {
                id: id.to_string(),
                reason: "Tenant ID cannot exceed 64 characters".to_string(),
            });
        }

        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(TenantError::InvalidTenantId {
                id: id.to_string(),
                reason: "Tenant ID can only contain ASCII alphanumeric characters, hyphens, and underscores".to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for TenantId {
    type Err = TenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenantId::new(s)
    }
}

/// A tenant as seen by this crate: an identifier plus the human-readable name
/// used as its subdomain label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// The tenant name, if it is present and not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }

    /// The subdomain label for this tenant: its name in lower case.
    ///
    /// Returns `None` for unnamed tenants, which cannot be addressed by subdomain.
    pub fn subdomain_label(&self) -> Option<String> {
        self.display_name().map(str::to_lowercase)
    }
}

#[derive(Debug, Clone)]
pub struct NewTenant {
    pub id: TenantId,
    pub name: Option<String>,
}

impl NewTenant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TenantId::new_random(),
            name: Some(name.into()),
        }
    }

    pub fn with_id(mut self, id: TenantId) -> Self {
        self.id = id;
        self
    }

    pub fn unnamed(id: TenantId) -> Self {
        Self { id, name: None }
    }
}

/// Runtime context for tenant-scoped operations.
///
/// A context either targets a single tenant's data partition or the host
/// partition, which owns records shared by every tenant.
///
/// # Examples
///
/// ```rust
/// use sekisho_core::tenant::{TenantContext, TenantId};
///
/// let tenant_id = TenantId::new("acme").unwrap();
/// let context = TenantContext::new(tenant_id);
/// assert_eq!(context.tenant_id().unwrap().as_str(), "acme");
///
/// assert!(TenantContext::host().is_host());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: Option<TenantId>,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        TenantContext {
            tenant_id: Some(tenant_id),
        }
    }

    /// Creates a context for the host partition.
    pub fn host() -> Self {
        TenantContext { tenant_id: None }
    }

    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref()
    }

    pub fn is_host(&self) -> bool {
        self.tenant_id.is_none()
    }

    /// Whether a record owned by `owner` is visible from this context.
    ///
    /// Host-owned records (`owner == None`) are shared with every tenant; a
    /// tenant-owned record is only visible from that tenant's context.
    pub fn can_access(&self, owner: Option<&TenantId>) -> bool {
        match owner {
            None => true,
            Some(owner) => self.tenant_id.as_ref() == Some(owner),
        }
    }

    /// Fails with `CrossTenantAccess` when [`can_access`](Self::can_access) is false.
    pub fn ensure_access(&self, owner: Option<&TenantId>) -> Result<(), TenantError> {
        if self.can_access(owner) {
            Ok(())
        } else {
            Err(TenantError::CrossTenantAccess)
        }
    }
}

impl Default for TenantContext {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for TenantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tenant_id {
            Some(id) => write!(f, "tenant:{id}"),
            None => write!(f, "host"),
        }
    }
}

/// Errors related to tenant operations.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    /// Invalid tenant identifier.
    #[error("Invalid tenant ID '{id}': {reason}")]
    InvalidTenantId { id: String, reason: String },

    /// Tenant not found.
    #[error("Tenant '{id}' not found")]
    TenantNotFound { id: String },

    /// Cross-tenant access attempt.
    #[error("Access denied: operation attempted across tenant boundaries")]
    CrossTenantAccess,
}
