//! In-process client implementations
//!
//! Both clients keep device objects in a flat map keyed by object URL and
//! share the table semantics implemented by [`Store`]:
//!
//! - create on an existing key is a conflict
//! - update merges the given fields, renaming the object when its key changes
//! - update of a missing singleton creates it
//! - delete removes the object and everything below its URL

pub mod local;
pub mod memory;

pub use local::LocalClient;
pub use memory::MemoryClient;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use crate::client::{ApiObject, ClientError, ClientResult, Endpoint};
use crate::paradict::Paradict;

/// API method of a recorded call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Add,
    Get,
    Update,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Add => "add",
            Method::Get => "get",
            Method::Update => "update",
            Method::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

/// Device objects keyed by object URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Store {
    objects: BTreeMap<String, ApiObject>,
}

impl Store {
    pub(crate) fn objects(&self) -> &BTreeMap<String, ApiObject> {
        &self.objects
    }

    pub(crate) fn insert(&mut self, url: String, obj: ApiObject) {
        self.objects.insert(url, obj);
    }

    pub(crate) fn create(
        &mut self,
        endpoint: &Endpoint,
        obj: &ApiObject,
        paradict: &Paradict,
    ) -> ClientResult<Option<JsonValue>> {
        let Some(field) = endpoint.mkey_field else {
            let url = endpoint.url(paradict)?;
            merge(self.objects.entry(url).or_default(), obj);
            return Ok(None);
        };

        let key = obj.get(field).and_then(key_string).ok_or_else(|| {
            ClientError::InvalidObject(format!("key field '{}' is missing", field))
        })?;
        let url = endpoint.object_url(Some(&key), paradict)?;
        if self.objects.contains_key(&url) {
            return Err(ClientError::Conflict(url));
        }
        self.objects.insert(url, obj.clone());

        Ok(Some(json!({ field: key })))
    }

    pub(crate) fn read(
        &self,
        endpoint: &Endpoint,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<Option<ApiObject>> {
        let url = endpoint.object_url(mkey, paradict)?;
        Ok(self.objects.get(&url).cloned())
    }

    pub(crate) fn update(
        &mut self,
        endpoint: &Endpoint,
        obj: &ApiObject,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<Option<JsonValue>> {
        let url = endpoint.object_url(mkey, paradict)?;

        let Some(field) = endpoint.mkey_field else {
            merge(self.objects.entry(url).or_default(), obj);
            return Ok(None);
        };

        let mut updated = self
            .objects
            .get(&url)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(url.clone()))?;
        merge(&mut updated, obj);

        let key = updated
            .get(field)
            .and_then(key_string)
            .or_else(|| mkey.map(str::to_string))
            .unwrap_or_default();
        let new_url = endpoint.object_url(Some(&key), paradict)?;
        if new_url != url {
            if self.objects.contains_key(&new_url) {
                return Err(ClientError::Conflict(new_url));
            }
            self.objects.remove(&url);
        }
        self.objects.insert(new_url, updated);

        Ok(Some(json!({ field: key })))
    }

    pub(crate) fn delete(
        &mut self,
        endpoint: &Endpoint,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<()> {
        let url = endpoint.object_url(mkey, paradict)?;
        if self.objects.remove(&url).is_none() {
            return Err(ClientError::NotFound(url));
        }

        let prefix = format!("{}/", url);
        self.objects.retain(|k, _| !k.starts_with(&prefix));
        Ok(())
    }
}

fn merge(target: &mut ApiObject, fields: &ApiObject) {
    for (k, v) in fields {
        target.insert(k.clone(), v.clone());
    }
}

fn key_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
