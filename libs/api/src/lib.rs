//! # tuskar-api
//!
//! Thin client SDK for the Tuskar deployment-planning API.
//!
//! The SDK has three layers, leaves first:
//!
//! - [`credentials`] / [`auth`]: gather credentials, check sufficiency, and
//!   resolve a `(token, endpoint)` session, either directly from a supplied
//!   token or through a Keystone v2 password authentication handshake.
//! - [`client`] / [`manager`]: a JSON HTTP transport plus a generic CRUD
//!   manager parametrized by resource type and collection path.
//! - [`plans`] / [`roles`] / [`overclouds`]: per-resource APIs built on the
//!   manager, exposed together through [`Client`].
//!
//! One session is resolved per process run; nothing is persisted to disk.

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;
pub mod manager;
pub mod marshal;
pub mod models;
pub mod overclouds;
pub mod plans;
pub mod roles;

pub use auth::{AuthResolver, Session};
pub use client::HttpClient;
pub use credentials::Credentials;
pub use error::{Error, Result};

/// The only API version this SDK speaks.
pub const SUPPORTED_API_VERSION: &str = "2";

/// Facade bundling the per-resource APIs over one transport.
#[derive(Debug, Clone)]
pub struct Client {
    pub plans: plans::PlanApi,
    pub roles: roles::RoleApi,
    pub overclouds: overclouds::OvercloudApi,
}

impl Client {
    /// Build a client from a resolved session.
    pub fn new(session: &Session) -> Result<Self> {
        let http = HttpClient::new(session)?;
        Ok(Self {
            plans: plans::PlanApi::new(http.clone()),
            roles: roles::RoleApi::new(http.clone()),
            overclouds: overclouds::OvercloudApi::new(http),
        })
    }
}
