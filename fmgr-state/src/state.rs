//! State file structures for persisting managed resources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use fmgr_core::convert::{json_to_value, value_to_json};
use fmgr_core::resource::ResourceData;

use crate::backend::{StateError, StateResult};

/// The main state file structure that persists to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file format version
    pub version: u32,
    /// Monotonically increasing number for each state modification
    pub serial: u64,
    /// Unique identifier for this state lineage
    pub lineage: String,
    /// Version of fmgr that last modified this state
    pub fmgr_version: String,
    pub resources: Vec<ResourceState>,
}

impl StateFile {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self::with_lineage(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_lineage(lineage: String) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            serial: 0,
            lineage,
            fmgr_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: Vec::new(),
        }
    }

    /// Reject state written by a newer format
    pub fn check_version(&self) -> StateResult<()> {
        if self.version > Self::CURRENT_VERSION {
            return Err(StateError::InvalidState(format!(
                "state format version {} is newer than supported version {}",
                self.version,
                Self::CURRENT_VERSION
            )));
        }
        Ok(())
    }

    /// Increment serial and update fmgr version for a new state write
    pub fn increment_serial(&mut self) {
        self.serial += 1;
        self.fmgr_version = env!("CARGO_PKG_VERSION").to_string();
    }

    /// Find a resource by type and local name
    pub fn find_resource(&self, resource_type: &str, name: &str) -> Option<&ResourceState> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.name == name)
    }

    pub fn find_resource_mut(
        &mut self,
        resource_type: &str,
        name: &str,
    ) -> Option<&mut ResourceState> {
        self.resources
            .iter_mut()
            .find(|r| r.resource_type == resource_type && r.name == name)
    }

    /// Find a resource by type and remote identifier
    pub fn find_by_id(&self, resource_type: &str, id: &str) -> Option<&ResourceState> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.id == id)
    }

    /// Add or replace a resource in the state
    pub fn upsert_resource(&mut self, resource: ResourceState) {
        if let Some(existing) = self.find_resource_mut(&resource.resource_type, &resource.name) {
            *existing = resource;
        } else {
            self.resources.push(resource);
        }
    }

    pub fn remove_resource(&mut self, resource_type: &str, name: &str) -> Option<ResourceState> {
        let pos = self
            .resources
            .iter()
            .position(|r| r.resource_type == resource_type && r.name == name)?;
        Some(self.resources.remove(pos))
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single managed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type (e.g., "object_firewall_address")
    pub resource_type: String,
    /// Local name the resource is declared under
    pub name: String,
    /// Remote identifier (mkey, or the type's display name for singletons)
    pub id: String,
    pub provider: String,
    /// Attributes as last read back from the device
    pub attributes: BTreeMap<String, serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceState {
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        id: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            id: id.into(),
            provider: provider.into(),
            attributes: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Record refreshed resource data under a local name
    pub fn from_data(name: impl Into<String>, provider: impl Into<String>, data: &ResourceData) -> Self {
        let attributes = data
            .attributes()
            .iter()
            .map(|(k, v)| (k.clone(), value_to_json(v)))
            .collect();
        Self {
            attributes,
            ..Self::new(data.resource_type.clone(), name, data.id(), provider)
        }
    }

    /// Resource data for the recorded object, with the recorded attributes
    /// as both current and prior state
    pub fn to_data(&self) -> ResourceData {
        let attributes = self
            .attributes
            .iter()
            .filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v)))
            .collect();
        let mut data = ResourceData::new(self.resource_type.clone())
            .with_id(self.id.clone())
            .with_attributes(attributes);
        data.commit();
        data
    }
}
