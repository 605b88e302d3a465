//! Provider configuration
//!
//! Loaded from a JSON file, e.g.
//!
//! ```json
//! {
//!   "adom": "root",
//!   "device_name": "fgt-01",
//!   "device_vdom": "root",
//!   "import_options": { "scopetype": "adom", "adom": "branch" },
//!   "retries": 1
//! }
//! ```
//!
//! `FMGR_ADOM`, `FMGR_DEVICE_NAME` and `FMGR_DEVICE_VDOM` override the file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_ADOM: &str = "FMGR_ADOM";
pub const ENV_DEVICE_NAME: &str = "FMGR_DEVICE_NAME";
pub const ENV_DEVICE_VDOM: &str = "FMGR_DEVICE_VDOM";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read provider config {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse provider config: {0}")]
    Parse(String),
}

/// Provider-level settings shared by every resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Adom used by resources with `scopetype = "inherit"`
    pub adom: String,
    /// Device used when a resource does not set `device_name`
    pub device_name: Option<String>,
    /// Vdom used when a resource does not set `device_vdom`
    pub device_vdom: String,
    /// Attribute values applied to every imported resource
    pub import_options: BTreeMap<String, String>,
    /// Attempts per API call
    pub retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            adom: "root".to_string(),
            device_name: None,
            device_vdom: "root".to_string(),
            import_options: BTreeMap::new(),
            retries: 1,
        }
    }
}

impl ProviderConfig {
    /// Load from a JSON file and apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_json(&content)?.with_env())
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `FMGR_*` environment overrides
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(adom) = lookup(ENV_ADOM).filter(|v| !v.is_empty()) {
            self.adom = adom;
        }
        if let Some(device) = lookup(ENV_DEVICE_NAME).filter(|v| !v.is_empty()) {
            self.device_name = Some(device);
        }
        if let Some(vdom) = lookup(ENV_DEVICE_VDOM).filter(|v| !v.is_empty()) {
            self.device_vdom = vdom;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = ProviderConfig::from_json(r#"{"device_name": "fgt-01"}"#).unwrap();
        assert_eq!(config.adom, "root");
        assert_eq!(config.device_vdom, "root");
        assert_eq!(config.device_name.as_deref(), Some("fgt-01"));
        assert_eq!(config.retries, 1);
        assert!(config.import_options.is_empty());
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_ADOM, "branch"), (ENV_DEVICE_VDOM, ""), (ENV_DEVICE_NAME, "fgt-02")]);
        let config = ProviderConfig::from_json(r#"{"adom": "root", "device_vdom": "dmz"}"#)
            .unwrap()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.adom, "branch");
        assert_eq!(config.device_name.as_deref(), Some("fgt-02"));
        // Empty values are ignored
        assert_eq!(config.device_vdom, "dmz");
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider.json");
        std::fs::write(
            &path,
            r#"{"import_options": {"scopetype": "adom", "adom": "branch"}, "retries": 3}"#,
        )
        .unwrap();

        let config = ProviderConfig::load(&path).unwrap();
        assert_eq!(config.retries, 3);
        assert_eq!(config.import_options.get("adom").map(String::as_str), Some("branch"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProviderConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            ProviderConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
