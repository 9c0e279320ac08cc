pub mod utilities;

use thiserror::Error;

pub use crate::tenant::TenantError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Tenant error: {0}")]
    Tenant(#[from] TenantError),

    #[error("Provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A required configuration value is absent or blank.
    #[error("Missing required configuration value '{key}'")]
    Missing { key: String },

    #[error("Invalid configuration value '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("OAuth client application '{client_id}' not found")]
    ClientApplicationNotFound { client_id: String },

    #[error("Malformed encoded URI list in '{field}': {value:?}")]
    MalformedEncodedList { field: String, value: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Record not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The record changed between read and write.
    #[error("Concurrency conflict: {0}")]
    Conflict(String),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid tenant name: {0}")]
    InvalidName(String),

    #[error("Invalid client ID: {0}")]
    InvalidClientId(String),

    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl Error {
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    pub fn is_provisioning_error(&self) -> bool {
        matches!(self, Error::Provisioning(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Storage(StorageError::Conflict(_)))
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(ValidationError::InvalidName(_))
                | Error::Validation(ValidationError::InvalidClientId(_))
                | Error::Validation(ValidationError::InvalidField(_))
                | Error::Validation(ValidationError::MissingField(_))
        )
    }
}
