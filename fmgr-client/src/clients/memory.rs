//! In-memory client
//!
//! Keeps device objects in process memory and records every call. Used by
//! tests and dry runs.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::{Method, Store};
use crate::client::{ApiObject, ClientError, ClientResult, DeviceClient, Endpoint};
use crate::paradict::Paradict;

/// In-memory device
#[derive(Debug, Default)]
pub struct MemoryClient {
    store: Mutex<Store>,
    calls: Mutex<Vec<(Method, String)>>,
    failures: Mutex<VecDeque<ClientError>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object at a rendered object URL
    pub fn insert(&self, url: impl Into<String>, obj: ApiObject) {
        lock(&self.store).insert(url.into(), obj);
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: ClientError) {
        lock(&self.failures).push_back(error);
    }

    /// Calls made so far, as (method, url)
    pub fn calls(&self) -> Vec<(Method, String)> {
        lock(&self.calls).clone()
    }

    /// Snapshot of all stored objects keyed by URL
    pub fn objects(&self) -> BTreeMap<String, ApiObject> {
        lock(&self.store).objects().clone()
    }

    fn begin(&self, method: Method, url: String) -> ClientResult<()> {
        log::debug!("{} {}", method, url);
        lock(&self.calls).push((method, url));
        match lock(&self.failures).pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn call_url(endpoint: &Endpoint, mkey: Option<&str>, paradict: &Paradict) -> String {
    let url = match mkey {
        Some(_) => endpoint.object_url(mkey, paradict),
        None => endpoint.url(paradict),
    };
    url.unwrap_or_else(|_| endpoint.path.to_string())
}

#[async_trait]
impl DeviceClient for MemoryClient {
    async fn create(
        &self,
        endpoint: &Endpoint,
        obj: &ApiObject,
        paradict: &Paradict,
    ) -> ClientResult<Option<JsonValue>> {
        self.begin(Method::Add, call_url(endpoint, None, paradict))?;
        lock(&self.store).create(endpoint, obj, paradict)
    }

    async fn read(
        &self,
        endpoint: &Endpoint,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<Option<ApiObject>> {
        self.begin(Method::Get, call_url(endpoint, mkey, paradict))?;
        lock(&self.store).read(endpoint, mkey, paradict)
    }

    async fn update(
        &self,
        endpoint: &Endpoint,
        obj: &ApiObject,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<Option<JsonValue>> {
        self.begin(Method::Update, call_url(endpoint, mkey, paradict))?;
        lock(&self.store).update(endpoint, obj, mkey, paradict)
    }

    async fn delete(
        &self,
        endpoint: &Endpoint,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<()> {
        self.begin(Method::Delete, call_url(endpoint, mkey, paradict))?;
        lock(&self.store).delete(endpoint, mkey, paradict)
    }
}
