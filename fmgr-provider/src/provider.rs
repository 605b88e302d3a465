//! Device management API provider
//!
//! Ties the resource definitions to a DeviceClient and the provider
//! configuration.

use fmgr_client::DeviceClient;
use fmgr_core::provider::{ProviderError, ProviderResult};

use crate::config::ProviderConfig;
use crate::schemas::{ResourceDefinition, definitions};

/// Device management API provider
pub struct FmgrProvider<C> {
    client: C,
    config: ProviderConfig,
    definitions: Vec<ResourceDefinition>,
}

impl<C: DeviceClient> FmgrProvider<C> {
    /// Create a provider serving every generated resource type
    pub fn new(client: C, config: ProviderConfig) -> Self {
        Self {
            client,
            config,
            definitions: definitions(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn definitions(&self) -> &[ResourceDefinition] {
        &self.definitions
    }

    /// Look up the definition of a resource type
    pub fn definition(&self, resource_type: &str) -> ProviderResult<&ResourceDefinition> {
        self.definitions
            .iter()
            .find(|d| d.type_name == resource_type)
            .ok_or_else(|| {
                ProviderError::new(format!("Unknown resource type: {}", resource_type))
                    .for_resource(resource_type, "")
            })
    }
}
