//! Plan API.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::HttpClient;
use crate::error::Result;
use crate::manager::Manager;
use crate::marshal::PatchOp;
use crate::models::{Plan, Ref};

fn plan_path(id: Option<&str>) -> String {
    match id {
        Some(id) => format!("/v2/plans/{id}"),
        None => "/v2/plans".to_string(),
    }
}

#[derive(Debug, Serialize)]
struct CreatePlanRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AddRoleRequest<'a> {
    uuid: &'a str,
}

/// Operations on deployment plans.
#[derive(Debug, Clone)]
pub struct PlanApi {
    manager: Manager<Plan>,
}

impl PlanApi {
    pub fn new(client: HttpClient) -> Self {
        Self {
            manager: Manager::new(client, "plan", plan_path),
        }
    }

    /// Create a plan. A duplicate name surfaces as [`crate::Error::Conflict`].
    pub async fn create(&self, name: &str, description: Option<&str>) -> Result<Option<Plan>> {
        self.manager
            .create(&CreatePlanRequest { name, description })
            .await
    }

    pub async fn list(&self) -> Result<Vec<Plan>> {
        self.manager.list().await
    }

    pub async fn get(&self, uuid: &str) -> Result<Option<Plan>> {
        self.manager.get(uuid).await
    }

    /// Apply a list of patch operations to a plan.
    pub async fn patch(&self, uuid: &str, ops: &[PatchOp]) -> Result<Option<Plan>> {
        self.manager.patch(uuid, &ops).await
    }

    pub async fn delete(&self, uuid: &str) -> Result<()> {
        self.manager.delete(uuid).await
    }

    /// Fetch the plan's template files as a name-to-content mapping.
    pub async fn templates(&self, uuid: &str) -> Result<BTreeMap<String, String>> {
        let path = format!("{}/templates", self.manager.single_path(uuid)?);
        self.manager.client().get(&path).await
    }

    /// Add a role to a plan; the service replies with the updated plan.
    pub async fn add_role(&self, plan: Ref<'_, Plan>, role_uuid: &str) -> Result<Option<Plan>> {
        let path = format!("{}/roles", self.manager.single_path(plan.id())?);
        self.manager
            .client()
            .post(&path, &AddRoleRequest { uuid: role_uuid })
            .await
    }

    /// Remove a role from a plan; the service replies with the updated plan.
    pub async fn remove_role(&self, plan: Ref<'_, Plan>, role_uuid: &str) -> Result<Option<Plan>> {
        let path = format!("{}/roles/{role_uuid}", self.manager.single_path(plan.id())?);
        self.manager.client().delete_returning(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_paths_follow_the_collection_id_convention() {
        assert_eq!(plan_path(None), "/v2/plans");
        assert_eq!(plan_path(Some("u1")), "/v2/plans/u1");
    }
}
