//! Typed resources returned by the API.
//!
//! Resources are value objects deserialized from response bodies; an update
//! produces a fresh instance from the new body rather than mutating the old
//! one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resource that carries its own identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Either a raw identifier or a resource carrying one.
///
/// Replaces the duck-typed "id or object" convention with an explicit sum
/// type and a single accessor.
#[derive(Debug, Clone, Copy)]
pub enum Ref<'a, R: Identified> {
    Id(&'a str),
    Obj(&'a R),
}

impl<'a, R: Identified> Ref<'a, R> {
    pub fn id(&self) -> &'a str {
        match self {
            Ref::Id(id) => id,
            Ref::Obj(resource) => resource.id(),
        }
    }
}

/// A named collection of roles, parameters and flavor/scale settings
/// describing a deployment topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub parameters: Vec<PlanParameter>,
}

impl Identified for Plan {
    fn id(&self) -> &str {
        &self.uuid
    }
}

/// A named, addressable component within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<u32>,
}

impl Identified for Role {
    fn id(&self) -> &str {
        &self.uuid
    }
}

/// A single plan parameter. Values are passed through untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanParameter {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

/// A deployed instantiation of infrastructure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overcloud {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stack_id: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub counts: Vec<RoleCount>,
}

impl Identified for Overcloud {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Desired node count for one overcloud role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    pub overcloud_role_id: String,
    pub num_nodes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_resolves_raw_and_object_identifiers() {
        let plan = Plan {
            uuid: "u1".to_string(),
            name: "myplan".to_string(),
            description: None,
            roles: Vec::new(),
            parameters: Vec::new(),
        };
        assert_eq!(Ref::<Plan>::Id("u2").id(), "u2");
        assert_eq!(Ref::Obj(&plan).id(), "u1");
    }

    #[test]
    fn plan_deserializes_with_missing_optionals() {
        let plan: Plan = serde_json::from_str(r#"{"uuid": "u1", "name": "myplan"}"#).unwrap();
        assert!(plan.roles.is_empty());
        assert!(plan.parameters.is_empty());
        assert!(plan.description.is_none());
    }
}
