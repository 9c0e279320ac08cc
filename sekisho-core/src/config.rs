//! Configuration for endpoint resolution, client seeding and domain tenancy.
//!
//! Each configuration can be read from environment variables or from an
//! appsettings-shaped JSON document, for example:
//!
//! ```json
//! {
//!   "App": {
//!     "SelfUrlWithSubdomain": "https://{0}.api.example.com",
//!     "FrontEndUrl": "https://{0}.example.com"
//!   },
//!   "AuthServer": { "Authority": "https://{0}.api.example.com/" },
//!   "RemoteServices": { "Default": { "BaseUrl": "https://{0}.api.example.com/" } }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, utilities::RequiredConfigExt};

pub const AUTHORITY_KEY: &str = "AuthServer:Authority";
pub const API_BASE_URL_KEY: &str = "RemoteServices:Default:BaseUrl";
pub const SELF_URL_WITH_SUBDOMAIN_KEY: &str = "App:SelfUrlWithSubdomain";
pub const FRONT_END_URL_KEY: &str = "App:FrontEndUrl";

/// Well-known client ID of the shared front-end OAuth client.
pub const DEFAULT_CLIENT_ID: &str = "BookStore_Blazor";

/// The two URL templates a front-end client resolves at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Authority URL template, may contain the tenant placeholder.
    pub authority: String,
    /// API base URL template, may contain the tenant placeholder.
    pub api_base_url: String,
}

impl EndpointConfig {
    pub fn new(authority: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            api_base_url: api_base_url.into(),
        }
    }

    /// Reads `AUTH_SERVER_AUTHORITY` and `REMOTE_SERVICES_DEFAULT_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Ok(Self {
            authority: std::env::var("AUTH_SERVER_AUTHORITY")
                .ok()
                .require_config(AUTHORITY_KEY)?,
            api_base_url: std::env::var("REMOTE_SERVICES_DEFAULT_BASE_URL")
                .ok()
                .require_config(API_BASE_URL_KEY)?,
        })
    }

    /// Reads `AuthServer:Authority` and `RemoteServices:Default:BaseUrl` from an
    /// appsettings document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let settings = AppSettings::parse(json)?;
        Ok(Self {
            authority: settings
                .auth_server
                .and_then(|s| s.authority)
                .require_config(AUTHORITY_KEY)?,
            api_base_url: settings
                .remote_services
                .and_then(|s| s.default)
                .and_then(|s| s.base_url)
                .require_config(API_BASE_URL_KEY)?,
        })
    }
}

/// Describes the shared front-end OAuth client created by the host-level seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSeedConfig {
    pub client_id: String,
    pub display_name: String,
    /// Canonical (non-tenant) root URL of the front end, e.g. `https://example.com`.
    pub root_url: String,
    pub redirect_path: String,
    pub post_logout_path: String,
}

impl Default for ClientSeedConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            display_name: "Blazor Application".to_string(),
            root_url: "https://localhost:44307".to_string(),
            redirect_path: "/authentication/login-callback".to_string(),
            post_logout_path: "/authentication/logout-callback".to_string(),
        }
    }
}

impl ClientSeedConfig {
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Reads `CLIENT_ID`, `CLIENT_DISPLAY_NAME`, `CLIENT_ROOT_URL`,
    /// `CLIENT_REDIRECT_PATH` and `CLIENT_POST_LOGOUT_PATH`, falling back to
    /// the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            client_id: std::env::var("CLIENT_ID").unwrap_or(defaults.client_id),
            display_name: std::env::var("CLIENT_DISPLAY_NAME").unwrap_or(defaults.display_name),
            root_url: std::env::var("CLIENT_ROOT_URL").unwrap_or(defaults.root_url),
            redirect_path: std::env::var("CLIENT_REDIRECT_PATH").unwrap_or(defaults.redirect_path),
            post_logout_path: std::env::var("CLIENT_POST_LOGOUT_PATH")
                .unwrap_or(defaults.post_logout_path),
        }
    }

    /// Canonical sign-in redirect URI.
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.root_url.trim_end_matches('/'), self.redirect_path)
    }

    /// Canonical post-logout redirect URI.
    pub fn post_logout_redirect_uri(&self) -> String {
        format!(
            "{}{}",
            self.root_url.trim_end_matches('/'),
            self.post_logout_path
        )
    }
}

/// Server-side domain tenancy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTenantConfig {
    /// API host template used to resolve the current tenant, e.g.
    /// `https://{0}.api.example.com`.
    pub self_url_with_subdomain: String,
    /// Front-end URL template used for wildcard redirect URIs, e.g.
    /// `https://{0}.example.com`.
    pub front_end_url: String,
}

impl DomainTenantConfig {
    pub fn new(
        self_url_with_subdomain: impl Into<String>,
        front_end_url: impl Into<String>,
    ) -> Self {
        Self {
            self_url_with_subdomain: self_url_with_subdomain.into(),
            front_end_url: front_end_url.into(),
        }
    }

    /// Reads `APP_SELF_URL_WITH_SUBDOMAIN` and `APP_FRONT_END_URL`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Ok(Self {
            self_url_with_subdomain: std::env::var("APP_SELF_URL_WITH_SUBDOMAIN")
                .ok()
                .require_config(SELF_URL_WITH_SUBDOMAIN_KEY)?,
            front_end_url: std::env::var("APP_FRONT_END_URL")
                .ok()
                .require_config(FRONT_END_URL_KEY)?,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let app = AppSettings::parse(json)?.app.unwrap_or_default();
        Ok(Self {
            self_url_with_subdomain: app
                .self_url_with_subdomain
                .require_config(SELF_URL_WITH_SUBDOMAIN_KEY)?,
            front_end_url: app.front_end_url.require_config(FRONT_END_URL_KEY)?,
        })
    }

    /// Redirect URI formats accepted for any tenant subdomain.
    pub fn wildcard_redirect_formats(&self) -> Vec<String> {
        let front_end = self.front_end_url.trim_end_matches('/');
        vec![
            format!("{front_end}/signin-oidc"),
            format!("{front_end}/signout-callback-oidc"),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AppSettings {
    app: Option<AppSection>,
    auth_server: Option<AuthServerSection>,
    remote_services: Option<RemoteServicesSection>,
}

impl AppSettings {
    fn parse(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Invalid {
            key: "appsettings".to_string(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AppSection {
    self_url_with_subdomain: Option<String>,
    front_end_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthServerSection {
    authority: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteServicesSection {
    default: Option<RemoteServiceSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteServiceSection {
    base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"{
        "App": {
            "SelfUrlWithSubdomain": "https://{0}.api.example.com",
            "FrontEndUrl": "https://{0}.example.com/"
        },
        "AuthServer": { "Authority": "https://{0}.api.example.com/", "RequireHttpsMetadata": true },
        "RemoteServices": { "Default": { "BaseUrl": "https://{0}.api.example.com/" } }
    }"#;

    #[test]
    fn test_endpoint_config_from_json() {
        let config = EndpointConfig::from_json_str(SETTINGS).unwrap();
        assert_eq!(config.authority, "https://{0}.api.example.com/");
        assert_eq!(config.api_base_url, "https://{0}.api.example.com/");
    }

    #[test]
    fn test_endpoint_config_missing_key() {
        let err = EndpointConfig::from_json_str(r#"{"AuthServer":{"Authority":"https://x/"}}"#)
            .unwrap_err();
        match err {
            ConfigurationError::Missing { key } => assert_eq!(key, API_BASE_URL_KEY),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_config_blank_value_is_missing() {
        let err = EndpointConfig::from_json_str(
            r#"{"AuthServer":{"Authority":" "},"RemoteServices":{"Default":{"BaseUrl":"https://x/"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::Missing { key } if key == AUTHORITY_KEY));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EndpointConfig::from_json_str("not json"),
            Err(ConfigurationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_domain_config_from_json() {
        let config = DomainTenantConfig::from_json_str(SETTINGS).unwrap();
        assert_eq!(config.self_url_with_subdomain, "https://{0}.api.example.com");
        assert_eq!(
            config.wildcard_redirect_formats(),
            vec![
                "https://{0}.example.com/signin-oidc".to_string(),
                "https://{0}.example.com/signout-callback-oidc".to_string(),
            ]
        );
    }

    #[test]
    fn test_client_seed_uris() {
        let config = ClientSeedConfig::default().with_root_url("https://example.com/");
        assert_eq!(config.client_id, DEFAULT_CLIENT_ID);
        assert_eq!(
            config.redirect_uri(),
            "https://example.com/authentication/login-callback"
        );
        assert_eq!(
            config.post_logout_redirect_uri(),
            "https://example.com/authentication/logout-callback"
        );
    }
}
