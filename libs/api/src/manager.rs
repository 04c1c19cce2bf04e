//! Generic CRUD base for per-resource APIs.
//!
//! A [`Manager`] is bound at construction to a concrete resource type, a
//! path-builder function and an optional response key, instead of relying on
//! subclass overrides.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::client::HttpClient;
use crate::error::{Error, Result};

/// Maps an optional resource id to a URL path: the single-resource path when
/// an id is given, the collection path otherwise.
pub type PathFn = fn(Option<&str>) -> String;

/// CRUD operations for one resource type.
#[derive(Debug, Clone)]
pub struct Manager<R> {
    client: HttpClient,
    resource_name: &'static str,
    path: PathFn,
    response_key: Option<&'static str>,
    _resource: PhantomData<R>,
}

impl<R: DeserializeOwned> Manager<R> {
    pub fn new(client: HttpClient, resource_name: &'static str, path: PathFn) -> Self {
        Self {
            client,
            resource_name,
            path,
            response_key: None,
            _resource: PhantomData,
        }
    }

    /// Expect list responses nested under `key` instead of a bare array.
    pub fn with_response_key(mut self, key: &'static str) -> Self {
        self.response_key = Some(key);
        self
    }

    pub(crate) fn client(&self) -> &HttpClient {
        &self.client
    }

    fn collection_path(&self) -> String {
        (self.path)(None)
    }

    /// Single-resource path; an empty id is rejected before any request so a
    /// DELETE can never land on the collection URL.
    pub(crate) fn single_path(&self, id: &str) -> Result<String> {
        if id.is_empty() {
            return Err(Error::IdRequired(self.resource_name));
        }
        Ok((self.path)(Some(id)))
    }

    /// POST to the collection path. `None` when the service replies without
    /// a body.
    pub async fn create<B: Serialize>(&self, body: &B) -> Result<Option<R>> {
        self.client.post(&self.collection_path(), body).await
    }

    /// GET the collection. A missing response key or empty array is an empty
    /// result, not an error; null elements are skipped.
    pub async fn list(&self) -> Result<Vec<R>> {
        let body: Value = self.client.get(&self.collection_path()).await?;

        let data = match self.response_key {
            Some(key) => match body.get(key) {
                Some(nested) => nested.clone(),
                None => return Ok(Vec::new()),
            },
            None => body,
        };

        let items = match data {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            single => vec![single],
        };

        items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| serde_json::from_value(item).map_err(Error::from))
            .collect()
    }

    /// GET a single resource. An empty result set is `None`, not an error.
    pub async fn get(&self, id: &str) -> Result<Option<R>> {
        let path = self.single_path(id)?;
        match self.client.get_optional::<Value>(&path).await? {
            None => Ok(None),
            Some(Value::Null) => Ok(None),
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
        }
    }

    /// PUT to the single-resource path. `None` when no body comes back.
    pub async fn update<B: Serialize>(&self, id: &str, body: &B) -> Result<Option<R>> {
        let path = self.single_path(id)?;
        self.client.put(&path, body).await
    }

    /// PATCH the single-resource path with a list of patch operations.
    pub async fn patch<B: Serialize>(&self, id: &str, body: &B) -> Result<Option<R>> {
        let path = self.single_path(id)?;
        self.client.patch(&path, body).await
    }

    /// DELETE the single-resource path.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = self.single_path(id)?;
        self.client.delete(&path).await
    }
}
