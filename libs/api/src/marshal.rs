//! CLI argument marshaling into request bodies.
//!
//! Turns `KEY=VALUE` string lists into attribute maps, role counts, and
//! JSON-Patch-style operation lists. Output order always matches input
//! argument order.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Role, RoleCount};

/// A single patch instruction applied to a resource via an update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOp {
    pub op: PatchOpKind,
    pub path: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOpKind {
    Add,
    Replace,
    Remove,
}

/// Split argument strings into `(key, value)` pairs.
///
/// Each entry may hold several pairs separated by semicolons; empty chunks
/// are skipped; a chunk without `=` is an error.
fn split_pairs(args: &[String]) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for arg in args {
        for chunk in arg.split(';') {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                continue;
            }
            let (key, value) = chunk
                .split_once('=')
                .ok_or_else(|| Error::MalformedPair(chunk.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::MalformedPair(chunk.to_string()));
            }
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    Ok(pairs)
}

/// Parse `KEY=VALUE` attribute arguments into a map.
///
/// Values are always kept as strings; on duplicate keys the last write wins.
pub fn format_attributes(args: &[String]) -> Result<BTreeMap<String, String>> {
    let mut attributes = BTreeMap::new();
    for (key, value) in split_pairs(args)? {
        attributes.insert(key, value);
    }
    Ok(attributes)
}

/// Parse `ROLE=COUNT` arguments into role counts, input order preserved and
/// last write winning on duplicate roles.
pub fn format_role_counts(args: &[String]) -> Result<Vec<RoleCount>> {
    let mut counts: Vec<RoleCount> = Vec::new();
    for (key, value) in split_pairs(args)? {
        let num_nodes: u32 = value.trim().parse().map_err(|_| Error::InvalidCount {
            key: key.clone(),
            value: value.clone(),
        })?;
        match counts.iter_mut().find(|c| c.overcloud_role_id == key) {
            Some(existing) => existing.num_nodes = num_nodes,
            None => counts.push(RoleCount {
                overcloud_role_id: key,
                num_nodes,
            }),
        }
    }
    Ok(counts)
}

/// Build one `add` operation per `KEY=VALUE` parameter argument.
pub fn parameters_to_patch(args: &[String]) -> Result<Vec<PatchOp>> {
    Ok(split_pairs(args)?
        .into_iter()
        .map(|(key, value)| PatchOp {
            op: PatchOpKind::Add,
            path: format!("/parameters/{key}"),
            value: Value::String(value),
        })
        .collect())
}

/// Build one `replace` operation per `ROLE=VALUE` argument, resolving role
/// names to their identifiers.
///
/// Role names match exactly and case-sensitively; an unresolvable name fails
/// the whole batch before any operation is produced.
pub fn role_args_to_patch(args: &[String], roles: &[Role], field: &str) -> Result<Vec<PatchOp>> {
    let mut ops = Vec::new();
    for (name, value) in split_pairs(args)? {
        let role = roles
            .iter()
            .find(|role| role.name == name)
            .ok_or_else(|| Error::RoleNotFound(name.clone()))?;
        ops.push(PatchOp {
            op: PatchOpKind::Replace,
            path: format!("/roles/{}/{}", role.uuid, field),
            value: Value::String(value),
        });
    }
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn roles() -> Vec<Role> {
        vec![
            Role {
                uuid: "r1".to_string(),
                name: "Compute".to_string(),
                version: Some(1),
            },
            Role {
                uuid: "r2".to_string(),
                name: "Controller".to_string(),
                version: Some(1),
            },
        ]
    }

    #[test]
    fn attributes_split_on_semicolons_and_entries() {
        let attrs = format_attributes(&strings(&["a=1;b=2", "c=3"])).unwrap();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs["a"], "1");
        assert_eq!(attrs["b"], "2");
        assert_eq!(attrs["c"], "3");
    }

    #[test]
    fn attributes_last_write_wins() {
        let attrs = format_attributes(&strings(&["a=1", "a=2"])).unwrap();
        assert_eq!(attrs["a"], "2");
    }

    #[test]
    fn attribute_values_keep_embedded_equals_signs() {
        let attrs = format_attributes(&strings(&["url=http://x?a=b"])).unwrap();
        assert_eq!(attrs["url"], "http://x?a=b");
    }

    #[test]
    fn malformed_pair_is_an_error() {
        assert!(matches!(
            format_attributes(&strings(&["novalue"])),
            Err(Error::MalformedPair(_))
        ));
    }

    #[test]
    fn parameters_patch_preserves_argument_order() {
        let ops = parameters_to_patch(&strings(&["a=1", "b=2"])).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].op, PatchOpKind::Add);
        assert_eq!(ops[0].path, "/parameters/a");
        assert_eq!(ops[0].value, Value::String("1".to_string()));
        assert_eq!(ops[1].op, PatchOpKind::Add);
        assert_eq!(ops[1].path, "/parameters/b");
        assert_eq!(ops[1].value, Value::String("2".to_string()));
    }

    #[test]
    fn role_patch_resolves_names_to_identifiers() {
        let ops =
            role_args_to_patch(&strings(&["Controller=baremetal", "Compute=x1"]), &roles(), "flavor")
                .unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].path, "/roles/r2/flavor");
        assert_eq!(ops[1].path, "/roles/r1/flavor");
        assert!(ops.iter().all(|op| op.op == PatchOpKind::Replace));
    }

    #[test]
    fn unknown_role_aborts_the_whole_batch() {
        // The valid first pair must not leak out as partial output.
        let err = role_args_to_patch(&strings(&["Compute=x1", "Storage=x2"]), &roles(), "count")
            .unwrap_err();
        match err {
            Error::RoleNotFound(name) => assert_eq!(name, "Storage"),
            other => panic!("expected RoleNotFound, got {other:?}"),
        }
    }

    #[test]
    fn role_name_matching_is_case_sensitive() {
        assert!(matches!(
            role_args_to_patch(&strings(&["compute=x1"]), &roles(), "count"),
            Err(Error::RoleNotFound(_))
        ));
    }

    #[test]
    fn role_counts_parse_numbers_in_order() {
        let counts = format_role_counts(&strings(&["control=1;compute=3"])).unwrap();
        assert_eq!(
            counts,
            vec![
                RoleCount {
                    overcloud_role_id: "control".to_string(),
                    num_nodes: 1,
                },
                RoleCount {
                    overcloud_role_id: "compute".to_string(),
                    num_nodes: 3,
                },
            ]
        );
    }

    #[test]
    fn role_counts_reject_non_numeric_values() {
        assert!(matches!(
            format_role_counts(&strings(&["compute=lots"])),
            Err(Error::InvalidCount { .. })
        ));
    }

    #[test]
    fn empty_input_produces_empty_output() {
        assert!(parameters_to_patch(&[]).unwrap().is_empty());
        assert!(format_attributes(&[]).unwrap().is_empty());
        assert!(role_args_to_patch(&[], &roles(), "count").unwrap().is_empty());
    }
}
