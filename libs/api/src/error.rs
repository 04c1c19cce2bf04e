//! Error types for the SDK.

use thiserror::Error;

/// Errors surfaced by the SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// The supplied credentials are insufficient for either auth mode.
    #[error("missing authentication options: {}", missing.join(", "))]
    MissingOptions { missing: Vec<String> },

    /// Password mode requires one of the two tenant fields.
    #[error("missing authentication options: tenant_id or tenant_name")]
    MissingTenant,

    /// The service catalog has no endpoint for the requested service.
    #[error("no '{endpoint_type}' endpoint for service type '{service_type}' in the service catalog")]
    EndpointNotFound {
        service_type: String,
        endpoint_type: String,
    },

    /// The identity service rejected the authentication request.
    #[error("authentication failed (status {status}): {message}")]
    AuthFailed { status: u16, message: String },

    #[error("not authorized")]
    Unauthorized,

    #[error("resource not found: {0}")]
    NotFound(String),

    /// A name lookup matched more than one resource.
    #[error("{0}")]
    Ambiguous(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An operation that addresses a single resource was called without an id.
    #[error("{0} id is required")]
    IdRequired(&'static str),

    /// A `ROLE=VALUE` argument named a role the plan does not contain.
    #[error("role '{0}' not found")]
    RoleNotFound(String),

    /// A CLI-style argument was not of the form `KEY=VALUE`.
    #[error("malformed KEY=VALUE pair: '{0}'")]
    MalformedPair(String),

    /// A role count argument carried a non-numeric value.
    #[error("invalid count '{value}' for '{key}': must be a non-negative number")]
    InvalidCount { key: String, value: String },
}

impl Error {
    pub(crate) fn missing(field: &str) -> Self {
        Error::MissingOptions {
            missing: vec![field.to_string()],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
