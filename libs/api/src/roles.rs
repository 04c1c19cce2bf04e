//! Role API.

use crate::client::HttpClient;
use crate::error::Result;
use crate::manager::Manager;
use crate::models::Role;

fn role_path(id: Option<&str>) -> String {
    match id {
        Some(id) => format!("/v2/roles/{id}"),
        None => "/v2/roles".to_string(),
    }
}

/// Operations on the roles available for plans.
#[derive(Debug, Clone)]
pub struct RoleApi {
    manager: Manager<Role>,
}

impl RoleApi {
    pub fn new(client: HttpClient) -> Self {
        Self {
            manager: Manager::new(client, "role", role_path),
        }
    }

    pub async fn list(&self) -> Result<Vec<Role>> {
        self.manager.list().await
    }
}
