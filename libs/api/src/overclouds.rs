//! Overcloud API.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::HttpClient;
use crate::error::{Error, Result};
use crate::manager::Manager;
use crate::models::{Overcloud, RoleCount};

fn overcloud_path(id: Option<&str>) -> String {
    match id {
        Some(id) => format!("/v2/overclouds/{id}"),
        None => "/v2/overclouds".to_string(),
    }
}

/// Request body for overcloud create and update.
#[derive(Debug, Default, Serialize)]
pub struct OvercloudBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub counts: Vec<RoleCount>,
}

/// Operations on overclouds.
#[derive(Debug, Clone)]
pub struct OvercloudApi {
    manager: Manager<Overcloud>,
}

impl OvercloudApi {
    pub fn new(client: HttpClient) -> Self {
        Self {
            manager: Manager::new(client, "overcloud", overcloud_path),
        }
    }

    pub async fn create(&self, body: &OvercloudBody) -> Result<Option<Overcloud>> {
        self.manager.create(body).await
    }

    pub async fn list(&self) -> Result<Vec<Overcloud>> {
        self.manager.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Overcloud>> {
        self.manager.get(id).await
    }

    pub async fn update(&self, id: &str, body: &OvercloudBody) -> Result<Option<Overcloud>> {
        self.manager.update(id, body).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.manager.delete(id).await
    }

    /// Resolve an id-or-name to an overcloud: an id lookup first, then an
    /// exact name match over the collection.
    pub async fn find(&self, ident: &str) -> Result<Overcloud> {
        let ident = ident.trim();
        if ident.is_empty() {
            return Err(Error::IdRequired("overcloud"));
        }

        if let Some(overcloud) = self.get(ident).await? {
            return Ok(overcloud);
        }

        let mut matches: Vec<Overcloud> = self
            .list()
            .await?
            .into_iter()
            .filter(|overcloud| overcloud.name == ident)
            .collect();

        match matches.len() {
            0 => Err(Error::NotFound(format!("Overcloud '{ident}' not found"))),
            1 => Ok(matches.remove(0)),
            _ => {
                let ids = matches
                    .iter()
                    .map(|overcloud| overcloud.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(Error::Ambiguous(format!(
                    "Overcloud name '{ident}' is ambiguous ({ids}). Use an explicit id."
                )))
            }
        }
    }
}
