//! Global option resolution.
//!
//! Every global flag has an environment fallback. Precedence is one rule
//! applied uniformly: CLI flag, then environment variable, then default.

use anyhow::Result;
use clap::Args;
use tuskar_api::Credentials;

use crate::error::command_error;

/// Global authentication and connection flags.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Defaults to env[OS_USERNAME].
    #[arg(long = "os-username", global = true, value_name = "USERNAME")]
    pub os_username: Option<String>,

    /// Defaults to env[OS_PASSWORD].
    #[arg(long = "os-password", global = true, value_name = "PASSWORD")]
    pub os_password: Option<String>,

    /// Defaults to env[OS_TENANT_ID].
    #[arg(long = "os-tenant-id", global = true, value_name = "TENANT_ID")]
    pub os_tenant_id: Option<String>,

    /// Defaults to env[OS_TENANT_NAME].
    #[arg(long = "os-tenant-name", global = true, value_name = "TENANT_NAME")]
    pub os_tenant_name: Option<String>,

    /// Defaults to env[OS_AUTH_URL].
    #[arg(long = "os-auth-url", global = true, value_name = "AUTH_URL")]
    pub os_auth_url: Option<String>,

    /// Defaults to env[OS_AUTH_TOKEN].
    #[arg(long = "os-auth-token", global = true, value_name = "TOKEN")]
    pub os_auth_token: Option<String>,

    /// Defaults to env[TUSKAR_URL].
    #[arg(long = "tuskar-url", global = true, value_name = "URL")]
    pub tuskar_url: Option<String>,

    /// Defaults to env[TUSKAR_API_VERSION] or 2.
    #[arg(long = "tuskar-api-version", global = true, value_name = "VERSION")]
    pub tuskar_api_version: Option<String>,

    /// Defaults to env[TUSKARCLIENT_DEBUG].
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Resolve one setting: flag over environment over default.
pub fn resolve(flag: Option<String>, env_var: &str, default: Option<&str>) -> Option<String> {
    flag.filter(|v| !v.is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
        .or_else(|| default.map(str::to_string))
}

/// Fully resolved global settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub api_version: String,
    pub debug: bool,
}

impl Settings {
    pub fn from_args(args: GlobalArgs) -> Self {
        let token = resolve(args.os_auth_token, "OS_AUTH_TOKEN", None);
        let auth_url = resolve(args.os_auth_url, "OS_AUTH_URL", None);
        let tuskar_url = resolve(args.tuskar_url, "TUSKAR_URL", None);

        // In token mode the auth URL doubles as the service endpoint when no
        // Tuskar URL was given.
        let endpoint = match &token {
            Some(_) => tuskar_url.clone().or_else(|| auth_url.clone()),
            None => tuskar_url.clone(),
        };

        let credentials = Credentials {
            username: resolve(args.os_username, "OS_USERNAME", None),
            password: resolve(args.os_password, "OS_PASSWORD", None),
            tenant_id: resolve(args.os_tenant_id, "OS_TENANT_ID", None),
            tenant_name: resolve(args.os_tenant_name, "OS_TENANT_NAME", None),
            token,
            auth_url,
            endpoint,
        };

        let api_version = resolve(args.tuskar_api_version, "TUSKAR_API_VERSION", Some("2"))
            .unwrap_or_else(|| "2".to_string());

        let debug = args.debug
            || std::env::var("TUSKARCLIENT_DEBUG")
                .map(|v| !v.is_empty())
                .unwrap_or(false);

        Self {
            credentials,
            api_version,
            debug,
        }
    }

    /// Validate that one of the two auth modes is fully specified, with
    /// flag/env names in the message. Runs before any network call.
    pub fn ensure_auth_info(&self) -> Result<()> {
        let creds = &self.credentials;

        if !creds.has_token() {
            if absent(&creds.username) {
                return Err(command_error(
                    "You must provide username via either --os-username or env[OS_USERNAME]",
                ));
            }
            if absent(&creds.password) {
                return Err(command_error(
                    "You must provide password via either --os-password or env[OS_PASSWORD]",
                ));
            }
            if absent(&creds.tenant_id) && absent(&creds.tenant_name) {
                return Err(command_error(
                    "You must provide tenant via either --os-tenant-name or --os-tenant-id \
                     or env[OS_TENANT_NAME] or env[OS_TENANT_ID]",
                ));
            }
            if absent(&creds.auth_url) {
                return Err(command_error(
                    "You must provide auth URL via either --os-auth-url or env[OS_AUTH_URL]",
                ));
            }
        } else if absent(&creds.endpoint) {
            return Err(command_error(
                "You must provide either --tuskar-url or --os-auth-url \
                 or env[TUSKAR_URL] or env[OS_AUTH_URL]",
            ));
        }

        Ok(())
    }
}

fn absent(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}
