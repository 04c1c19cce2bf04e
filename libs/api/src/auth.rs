//! Session resolution against a Keystone v2 identity service.
//!
//! Token mode returns the supplied `(token, endpoint)` pair without any
//! network traffic. Password mode performs one `POST {auth_url}/tokens`
//! handshake, then resolves the target endpoint from the returned service
//! catalog unless an explicit endpoint override was supplied.

use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Catalog service type looked up when none is requested.
pub const DEFAULT_SERVICE_TYPE: &str = "management";

/// Catalog endpoint interface looked up when none is requested.
pub const DEFAULT_ENDPOINT_TYPE: &str = "publicURL";

/// A resolved bearer token and service base URL.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub endpoint: String,
}

/// Resolves credentials into a [`Session`], authenticating at most once.
///
/// The resolved session lives in an explicit `Option` field set exactly once
/// by [`AuthResolver::resolve`]; later calls reuse it.
#[derive(Debug)]
pub struct AuthResolver {
    credentials: Credentials,
    session: Option<Session>,
}

impl AuthResolver {
    /// Validate credential sufficiency and build a resolver.
    pub fn new(credentials: Credentials) -> Result<Self> {
        credentials.check_sufficiency()?;
        Ok(Self {
            credentials,
            session: None,
        })
    }

    /// Resolve a token and service endpoint.
    ///
    /// `service_type` defaults to [`DEFAULT_SERVICE_TYPE`] and
    /// `endpoint_type` to [`DEFAULT_ENDPOINT_TYPE`]. Token-mode resolution is
    /// side-effect free; password mode authenticates lazily, once per
    /// resolver.
    pub async fn resolve(
        &mut self,
        service_type: Option<&str>,
        endpoint_type: Option<&str>,
    ) -> Result<Session> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }

        let session = if self.credentials.has_token() {
            self.token_session()?
        } else {
            self.authenticate(
                service_type.unwrap_or(DEFAULT_SERVICE_TYPE),
                endpoint_type.unwrap_or(DEFAULT_ENDPOINT_TYPE),
            )
            .await?
        };

        self.session = Some(session.clone());
        Ok(session)
    }

    fn token_session(&self) -> Result<Session> {
        let token = required(&self.credentials.token, "token")?;
        let endpoint = required(&self.credentials.endpoint, "endpoint")?;
        Ok(Session {
            token: token.to_string(),
            endpoint: endpoint.to_string(),
        })
    }

    async fn authenticate(&self, service_type: &str, endpoint_type: &str) -> Result<Session> {
        let auth_url = required(&self.credentials.auth_url, "auth_url")?
            .trim_end_matches('/')
            .to_string();
        let request = TokenRequest {
            auth: AuthPayload {
                password_credentials: PasswordCredentials {
                    username: required(&self.credentials.username, "username")?,
                    password: required(&self.credentials.password, "password")?,
                },
                tenant_id: self.credentials.tenant_id.as_deref(),
                tenant_name: self.credentials.tenant_name.as_deref(),
            },
        };

        tracing::debug!(%auth_url, service_type, endpoint_type, "authenticating");

        let response = reqwest::Client::new()
            .post(format!("{auth_url}/tokens"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::AuthFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await.map_err(Error::Network)?;

        let endpoint = match self.credentials.endpoint.as_deref() {
            // An explicit endpoint override always beats catalog lookup.
            Some(endpoint) if !endpoint.is_empty() => endpoint.to_string(),
            _ => catalog_url_for(&body.access.service_catalog, service_type, endpoint_type)?,
        };

        Ok(Session {
            token: body.access.token.id,
            endpoint,
        })
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::missing(name))
}

/// Find the first matching endpoint URL in a service catalog.
fn catalog_url_for(
    catalog: &[CatalogService],
    service_type: &str,
    endpoint_type: &str,
) -> Result<String> {
    catalog
        .iter()
        .filter(|service| service.service_type == service_type)
        .flat_map(|service| &service.endpoints)
        .find_map(|endpoint| endpoint.url_for(endpoint_type))
        .map(str::to_string)
        .ok_or_else(|| Error::EndpointNotFound {
            service_type: service_type.to_string(),
            endpoint_type: endpoint_type.to_string(),
        })
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    auth: AuthPayload<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthPayload<'a> {
    password_credentials: PasswordCredentials<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: Access,
}

#[derive(Debug, Deserialize)]
struct Access {
    token: Token,
    #[serde(rename = "serviceCatalog", default)]
    service_catalog: Vec<CatalogService>,
}

#[derive(Debug, Deserialize)]
struct Token {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CatalogService {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogEndpoint {
    #[serde(rename = "publicURL")]
    public_url: Option<String>,
    #[serde(rename = "adminURL")]
    admin_url: Option<String>,
    #[serde(rename = "internalURL")]
    internal_url: Option<String>,
}

impl CatalogEndpoint {
    fn url_for(&self, endpoint_type: &str) -> Option<&str> {
        let url = match endpoint_type {
            "publicURL" => &self.public_url,
            "adminURL" => &self.admin_url,
            "internalURL" => &self.internal_url,
            _ => &None,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogService> {
        vec![
            CatalogService {
                service_type: "identity".to_string(),
                endpoints: vec![CatalogEndpoint {
                    public_url: Some("http://keystone:5000/v2.0".to_string()),
                    ..CatalogEndpoint::default()
                }],
            },
            CatalogService {
                service_type: "management".to_string(),
                endpoints: vec![CatalogEndpoint {
                    public_url: Some("http://tuskar:8585".to_string()),
                    admin_url: Some("http://tuskar-admin:8585".to_string()),
                    ..CatalogEndpoint::default()
                }],
            },
        ]
    }

    #[test]
    fn catalog_lookup_matches_service_and_endpoint_type() {
        let url = catalog_url_for(&catalog(), "management", "publicURL").unwrap();
        assert_eq!(url, "http://tuskar:8585");

        let url = catalog_url_for(&catalog(), "management", "adminURL").unwrap();
        assert_eq!(url, "http://tuskar-admin:8585");
    }

    #[test]
    fn catalog_lookup_fails_for_unknown_service() {
        let err = catalog_url_for(&catalog(), "compute", "publicURL").unwrap_err();
        assert!(matches!(err, Error::EndpointNotFound { .. }));
    }

    #[test]
    fn catalog_lookup_fails_for_missing_interface() {
        let err = catalog_url_for(&catalog(), "identity", "internalURL").unwrap_err();
        assert!(matches!(err, Error::EndpointNotFound { .. }));
    }

    #[tokio::test]
    async fn token_mode_resolves_without_network() {
        let mut resolver = AuthResolver::new(Credentials {
            token: Some("tok".to_string()),
            endpoint: Some("http://tuskar:8585".to_string()),
            ..Credentials::default()
        })
        .unwrap();

        let session = resolver.resolve(None, None).await.unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.endpoint, "http://tuskar:8585");

        // Idempotent: a second resolution returns the cached session.
        let again = resolver.resolve(None, None).await.unwrap();
        assert_eq!(again.token, "tok");
    }

    #[test]
    fn insufficient_credentials_fail_at_construction() {
        assert!(AuthResolver::new(Credentials::default()).is_err());
    }
}
