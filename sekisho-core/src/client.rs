//! OAuth client application records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ProvisioningError, ValidationError, utilities::RequiredFieldExt},
    redirect_uris::RedirectUriSet,
    tenant::TenantId,
};

pub const REDIRECT_URIS_FIELD: &str = "RedirectUris";
pub const POST_LOGOUT_REDIRECT_URIS_FIELD: &str = "PostLogoutRedirectUris";

/// An OAuth client registration owned by the authorization server's storage.
///
/// The two URI lists are kept in their stored, string-encoded form; use
/// [`redirect_uri_set`](Self::redirect_uri_set) and
/// [`post_logout_redirect_uri_set`](Self::post_logout_redirect_uri_set) to
/// decode them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientApplication {
    pub client_id: String,
    pub display_name: Option<String>,
    /// Owning tenant, `None` for a host-level client shared by all tenants.
    pub tenant_id: Option<TenantId>,
    pub redirect_uris: String,
    pub post_logout_redirect_uris: String,
    /// Changes on every successful update; writers must present the value they read.
    pub concurrency_stamp: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientApplication {
    pub fn redirect_uri_set(&self) -> Result<RedirectUriSet, ProvisioningError> {
        decode(REDIRECT_URIS_FIELD, &self.redirect_uris)
    }

    pub fn post_logout_redirect_uri_set(&self) -> Result<RedirectUriSet, ProvisioningError> {
        decode(
            POST_LOGOUT_REDIRECT_URIS_FIELD,
            &self.post_logout_redirect_uris,
        )
    }

    pub fn is_shared(&self) -> bool {
        self.tenant_id.is_none()
    }
}

fn decode(field: &str, value: &str) -> Result<RedirectUriSet, ProvisioningError> {
    RedirectUriSet::parse(value).map_err(|_| ProvisioningError::MalformedEncodedList {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct NewClientApplication {
    pub client_id: String,
    pub display_name: Option<String>,
    pub tenant_id: Option<TenantId>,
    pub redirect_uris: RedirectUriSet,
    pub post_logout_redirect_uris: RedirectUriSet,
}

impl NewClientApplication {
    pub fn builder() -> NewClientApplicationBuilder {
        NewClientApplicationBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct NewClientApplicationBuilder {
    client_id: Option<String>,
    display_name: Option<String>,
    tenant_id: Option<TenantId>,
    redirect_uris: RedirectUriSet,
    post_logout_redirect_uris: RedirectUriSet,
}

impl NewClientApplicationBuilder {
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn tenant_id(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.append_if_absent(uri);
        self
    }

    pub fn post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.post_logout_redirect_uris.append_if_absent(uri);
        self
    }

    pub fn build(self) -> Result<NewClientApplication, ValidationError> {
        let client_id = self.client_id.require_field("ClientId")?;
        if client_id.trim().is_empty() {
            return Err(ValidationError::InvalidClientId(
                "client ID cannot be blank".to_string(),
            ));
        }

        Ok(NewClientApplication {
            client_id,
            display_name: self.display_name,
            tenant_id: self.tenant_id,
            redirect_uris: self.redirect_uris,
            post_logout_redirect_uris: self.post_logout_redirect_uris,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(redirect_uris: &str) -> ClientApplication {
        ClientApplication {
            client_id: "BookStore_Blazor".to_string(),
            display_name: None,
            tenant_id: None,
            redirect_uris: redirect_uris.to_string(),
            post_logout_redirect_uris: "[]".to_string(),
            concurrency_stamp: "stamp".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_decode_lists() {
        let app = application("[https://example.com/signin-oidc]");
        assert_eq!(
            app.redirect_uri_set().unwrap().canonical(),
            Some("https://example.com/signin-oidc")
        );
        assert!(app.post_logout_redirect_uri_set().unwrap().is_empty());
        assert!(app.is_shared());
    }

    #[test]
    fn test_malformed_list_names_field() {
        let app = application("https://example.com/signin-oidc");
        match app.redirect_uri_set().unwrap_err() {
            ProvisioningError::MalformedEncodedList { field, value } => {
                assert_eq!(field, REDIRECT_URIS_FIELD);
                assert_eq!(value, "https://example.com/signin-oidc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_builder() {
        let new_app = NewClientApplication::builder()
            .client_id("BookStore_Blazor")
            .redirect_uri("https://example.com/signin-oidc")
            .redirect_uri("https://example.com/signin-oidc")
            .post_logout_redirect_uri("https://example.com/signout-callback-oidc")
            .build()
            .unwrap();

        assert_eq!(
            new_app.redirect_uris.serialize(),
            "[https://example.com/signin-oidc]"
        );
        assert_eq!(new_app.post_logout_redirect_uris.len(), 1);
        assert!(new_app.tenant_id.is_none());
    }

    #[test]
    fn test_builder_requires_client_id() {
        assert!(matches!(
            NewClientApplication::builder().build(),
            Err(ValidationError::MissingField(_))
        ));
        assert!(matches!(
            NewClientApplication::builder().client_id(" ").build(),
            Err(ValidationError::InvalidClientId(_))
        ));
    }
}
