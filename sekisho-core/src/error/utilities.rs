use crate::{
    Error,
    error::{ConfigurationError, StorageError, ValidationError},
};

/// Extension trait for Result types to simplify database error mapping
///
/// # Example
///
/// ```rust,ignore
/// use sekisho_core::error::utilities::DatabaseResultExt;
///
/// query.execute(&pool).await.map_db_err()?;
/// ```
pub trait DatabaseResultExt<T> {
    /// Convert a database error to a storage error
    fn map_db_err(self) -> Result<T, Error>;

    /// Convert a database error to a storage error with additional context
    fn map_db_err_with_context(self, context: &str) -> Result<T, Error>;
}

impl<T, E: std::fmt::Display> DatabaseResultExt<T> for Result<T, E> {
    fn map_db_err(self) -> Result<T, Error> {
        self.map_err(|e| Error::Storage(StorageError::Database(e.to_string())))
    }

    fn map_db_err_with_context(self, context: &str) -> Result<T, Error> {
        self.map_err(|e| Error::Storage(StorageError::Database(format!("{context}: {e}"))))
    }
}

/// Extension trait for Option types to simplify required field validation
///
/// # Example
///
/// ```rust
/// use sekisho_core::error::utilities::RequiredFieldExt;
///
/// let name: Option<String> = Some("acme".to_string());
/// let name = name.require_field("Name").unwrap();
/// assert_eq!(name, "acme");
/// ```
pub trait RequiredFieldExt<T> {
    /// Convert None to a ValidationError::MissingField
    fn require_field(self, field_name: &str) -> Result<T, ValidationError>;
}

impl<T> RequiredFieldExt<T> for Option<T> {
    fn require_field(self, field_name: &str) -> Result<T, ValidationError> {
        self.ok_or_else(|| ValidationError::MissingField(format!("{field_name} is required")))
    }
}

/// Extension trait for required configuration values.
///
/// Absent values and values that are empty after trimming both count as missing.
pub trait RequiredConfigExt {
    fn require_config(self, key: &str) -> Result<String, ConfigurationError>;
}

impl RequiredConfigExt for Option<String> {
    fn require_config(self, key: &str) -> Result<String, ConfigurationError> {
        match self {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigurationError::Missing {
                key: key.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_result_ext() {
        let error_result: Result<i32, &str> = Err("database connection failed");

        match error_result.map_db_err().unwrap_err() {
            Error::Storage(StorageError::Database(msg)) => {
                assert_eq!(msg, "database connection failed");
            }
            _ => panic!("Expected storage database error"),
        }
    }

    #[test]
    fn test_database_result_ext_with_context() {
        let error_result: Result<i32, &str> = Err("timeout");

        match error_result
            .map_db_err_with_context("Failed to update client application")
            .unwrap_err()
        {
            Error::Storage(StorageError::Database(msg)) => {
                assert_eq!(msg, "Failed to update client application: timeout");
            }
            _ => panic!("Expected storage database error"),
        }
    }

    #[test]
    fn test_required_field_ext() {
        assert_eq!(Some("acme").require_field("Name").unwrap(), "acme");

        let none_value: Option<String> = None;
        match none_value.require_field("Name").unwrap_err() {
            ValidationError::MissingField(msg) => assert_eq!(msg, "Name is required"),
            _ => panic!("Expected missing field validation error"),
        }
    }

    #[test]
    fn test_required_config_ext() {
        assert_eq!(
            Some("https://{0}.example.com/".to_string())
                .require_config("AuthServer:Authority")
                .unwrap(),
            "https://{0}.example.com/"
        );

        for value in [None, Some(String::new()), Some("   ".to_string())] {
            match value.require_config("AuthServer:Authority").unwrap_err() {
                ConfigurationError::Missing { key } => assert_eq!(key, "AuthServer:Authority"),
                _ => panic!("Expected missing configuration error"),
            }
        }
    }
}
