//! HTTP transport for API communication.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::auth::Session;
use crate::error::{Error, Result};

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// JSON HTTP client bound to a resolved session.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client carrying the session token on every request.
    pub fn new(session: &Session) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTH_TOKEN_HEADER,
            HeaderValue::from_str(&session.token).map_err(|_| Error::Unauthorized)?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: session.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        self.handle_response(response).await
    }

    /// GET a JSON body, mapping a 404 to `None`.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        tracing::debug!(path, "GET");
        let response = self.client.get(self.url(path)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_body(response).await
    }

    /// POST a JSON body; services may reply with no body.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        tracing::debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        self.handle_body(response).await
    }

    /// PUT a JSON body; services may reply with no body.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        tracing::debug!(path, "PUT");
        let response = self.client.put(self.url(path)).json(body).send().await?;
        self.handle_body(response).await
    }

    /// PATCH a JSON body; services may reply with no body.
    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        tracing::debug!(path, "PATCH");
        let response = self.client.patch(self.url(path)).json(body).send().await?;
        self.handle_body(response).await
    }

    /// DELETE, discarding any response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!(path, "DELETE");
        let response = self.client.delete(self.url(path)).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for(response).await)
        }
    }

    /// DELETE where the service replies with the updated resource.
    pub async fn delete_returning<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        tracing::debug!(path, "DELETE");
        let response = self.client.delete(self.url(path)).send().await?;
        self.handle_body(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.error_for(response).await)
        }
    }

    /// Like `handle_response`, but tolerates an empty success body.
    async fn handle_body<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        if !response.status().is_success() {
            return Err(self.error_for(response).await);
        }
        let text = response.text().await?;
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn error_for(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let message = match response.text().await {
            Ok(body) => extract_error_message(&body)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            Err(_) => format!("HTTP {}", status.as_u16()),
        };

        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized,
            StatusCode::NOT_FOUND => Error::NotFound(message),
            StatusCode::CONFLICT => Error::Conflict(message),
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// OpenStack-style error envelopes: `{"error": {"message": ...}}` or
/// `{"error_message": ...}` or a bare `{"message": ...}`.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed: ServiceErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .and_then(|e| e.message)
        .or(parsed.error_message)
        .or(parsed.message)
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new(&Session {
            token: "tok".to_string(),
            endpoint: "http://tuskar:8585/".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn url_building_trims_trailing_slash() {
        assert_eq!(client().url("/v2/plans"), "http://tuskar:8585/v2/plans");
    }

    #[test]
    fn error_message_extraction_handles_openstack_envelopes() {
        assert_eq!(
            extract_error_message(r#"{"error": {"message": "bad plan"}}"#).as_deref(),
            Some("bad plan")
        );
        assert_eq!(
            extract_error_message(r#"{"error_message": "boom"}"#).as_deref(),
            Some("boom")
        );
        assert_eq!(extract_error_message("not json"), None);
    }
}
