//! Local file client
//!
//! Stores device objects in a local JSON file (default: fmgr.device.json).
//! Every call loads the file, applies the change and writes it back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::Store;
use crate::client::{ApiObject, ClientError, ClientResult, DeviceClient, Endpoint};
use crate::paradict::Paradict;

/// File-backed device for development and offline use
pub struct LocalClient {
    /// Path to the device store file
    path: PathBuf,
}

impl LocalClient {
    /// Default store file name
    pub const DEFAULT_STORE_FILE: &'static str = "fmgr.device.json";

    /// Create a LocalClient with the default path in the current directory
    pub fn new() -> Self {
        Self::with_path(PathBuf::from(Self::DEFAULT_STORE_FILE))
    }

    /// Create a LocalClient with a specific store file path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored objects keyed by URL
    pub fn objects(&self) -> ClientResult<BTreeMap<String, ApiObject>> {
        Ok(self.load()?.objects().clone())
    }

    fn load(&self) -> ClientResult<Store> {
        if !self.path.exists() {
            return Ok(Store::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Io(format!("Failed to read device store: {}", e)))?;

        serde_json::from_str(&content).map_err(|e| {
            ClientError::Serialization(format!("Failed to parse device store: {}", e))
        })
    }

    fn save(&self, store: &Store) -> ClientResult<()> {
        let content = serde_json::to_string_pretty(store).map_err(|e| {
            ClientError::Serialization(format!("Failed to serialize device store: {}", e))
        })?;

        std::fs::write(&self.path, content)
            .map_err(|e| ClientError::Io(format!("Failed to write device store: {}", e)))
    }
}

impl Default for LocalClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceClient for LocalClient {
    async fn create(
        &self,
        endpoint: &Endpoint,
        obj: &ApiObject,
        paradict: &Paradict,
    ) -> ClientResult<Option<JsonValue>> {
        log::debug!("add {} ({})", endpoint.path, self.path.display());
        let mut store = self.load()?;
        let response = store.create(endpoint, obj, paradict)?;
        self.save(&store)?;
        Ok(response)
    }

    async fn read(
        &self,
        endpoint: &Endpoint,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<Option<ApiObject>> {
        log::debug!("get {} ({})", endpoint.path, self.path.display());
        self.load()?.read(endpoint, mkey, paradict)
    }

    async fn update(
        &self,
        endpoint: &Endpoint,
        obj: &ApiObject,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<Option<JsonValue>> {
        log::debug!("update {} ({})", endpoint.path, self.path.display());
        let mut store = self.load()?;
        let response = store.update(endpoint, obj, mkey, paradict)?;
        self.save(&store)?;
        Ok(response)
    }

    async fn delete(
        &self,
        endpoint: &Endpoint,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<()> {
        log::debug!("delete {} ({})", endpoint.path, self.path.display());
        let mut store = self.load()?;
        store.delete(endpoint, mkey, paradict)?;
        self.save(&store)
    }
}
