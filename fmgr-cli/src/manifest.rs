//! Resource manifest
//!
//! The desired resources `plan` and `apply` converge the device to:
//!
//! ```json
//! {
//!   "provider": { "adom": "root", "device_name": "fgt-01" },
//!   "resources": [
//!     {
//!       "type": "object_firewall_address",
//!       "name": "lan",
//!       "attributes": { "name": "lan", "subnet": ["10.0.0.0", "255.255.255.0"] }
//!     }
//!   ]
//! }
//! ```
//!
//! Nested blocks may be written as a single object or as a one-element list.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use fmgr_core::convert::json_to_value;
use fmgr_core::resource::Value;
use fmgr_core::schema::{AttributeType, BlockSchema, ResourceSchema};
use fmgr_provider::ProviderConfig;

pub const DEFAULT_MANIFEST_FILE: &str = "fmgr.json";

#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub provider: Option<ProviderConfig>,
    #[serde(default)]
    pub resources: Vec<ResourceBlock>,
}

/// One declared resource
#[derive(Debug, Deserialize)]
pub struct ResourceBlock {
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Local name, unique per type
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, JsonValue>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)?;

        let mut seen = HashSet::new();
        for block in &manifest.resources {
            if !seen.insert((block.resource_type.as_str(), block.name.as_str())) {
                bail!(
                    "Duplicate resource {}.{}",
                    block.resource_type,
                    block.name
                );
            }
        }
        Ok(manifest)
    }

    pub fn contains(&self, resource_type: &str, name: &str) -> bool {
        self.resources
            .iter()
            .any(|r| r.resource_type == resource_type && r.name == name)
    }
}

impl ResourceBlock {
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }

    /// Desired attributes, typed by the schema, with defaults applied and validated
    pub fn desired(&self, schema: &ResourceSchema) -> Result<HashMap<String, Value>> {
        desired_attributes(schema, &self.attributes)
            .with_context(|| format!("Invalid resource {}", self.address()))
    }
}

/// Convert user-written JSON attributes into resource attributes
pub fn desired_attributes(
    schema: &ResourceSchema,
    attributes: &serde_json::Map<String, JsonValue>,
) -> Result<HashMap<String, Value>> {
    let mut desired = HashMap::new();
    for (name, json) in attributes {
        let Some(attr) = schema.get(name) else {
            bail!("Unknown attribute '{}' for {}", name, schema.resource_type);
        };
        if let Some(value) = to_value(&attr.attr_type, json) {
            desired.insert(name.clone(), value);
        }
    }

    schema.apply_defaults(&mut desired);
    if let Err(errors) = schema.validate(&desired) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        bail!("{}", messages.join("; "));
    }
    Ok(desired)
}

fn to_value(attr_type: &AttributeType, json: &JsonValue) -> Option<Value> {
    match (attr_type, json) {
        (AttributeType::Block(block), JsonValue::Object(_)) => {
            to_row(block, json).map(|row| Value::List(vec![row]))
        }
        (AttributeType::Block(block) | AttributeType::Table(block), JsonValue::Array(rows)) => Some(
            Value::List(rows.iter().filter_map(|row| to_row(block, row)).collect()),
        ),
        _ => json_to_value(json),
    }
}

fn to_row(block: &BlockSchema, json: &JsonValue) -> Option<Value> {
    let JsonValue::Object(map) = json else {
        return json_to_value(json);
    };
    let row = map
        .iter()
        .filter_map(|(k, v)| {
            let value = match block.attributes.get(k) {
                Some(attr) => to_value(&attr.attr_type, v),
                None => json_to_value(v),
            };
            value.map(|value| (k.clone(), value))
        })
        .collect();
    Some(Value::Map(row))
}
