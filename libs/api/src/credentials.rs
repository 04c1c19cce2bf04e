//! Credential record and sufficiency rules.

use crate::error::{Error, Result};

/// Authentication inputs, merged from CLI flags and environment variables.
///
/// Two modes are supported: a pre-resolved bearer token plus service
/// endpoint, or a Keystone password login (username, password, auth URL and
/// one of the tenant fields). Constructed once per invocation and treated as
/// immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant_name: Option<String>,
    pub token: Option<String>,
    pub auth_url: Option<String>,
    pub endpoint: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl Credentials {
    /// Whether a bearer token was supplied (token mode).
    pub fn has_token(&self) -> bool {
        present(&self.token)
    }

    /// Check that enough options are present for one of the auth modes.
    ///
    /// Token mode requires `token` and `endpoint`. Password mode requires a
    /// tenant (either field), reported as a dedicated error before the
    /// generic check on `username`, `password` and `auth_url`.
    pub fn check_sufficiency(&self) -> Result<()> {
        let lookup: Vec<(&str, bool)> = if self.has_token() {
            vec![
                ("token", present(&self.token)),
                ("endpoint", present(&self.endpoint)),
            ]
        } else {
            if !present(&self.tenant_id) && !present(&self.tenant_name) {
                return Err(Error::MissingTenant);
            }
            vec![
                ("username", present(&self.username)),
                ("password", present(&self.password)),
                ("auth_url", present(&self.auth_url)),
            ]
        };

        let missing: Vec<String> = lookup
            .into_iter()
            .filter(|(_, is_present)| !is_present)
            .map(|(name, _)| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingOptions { missing })
        }
    }
}
