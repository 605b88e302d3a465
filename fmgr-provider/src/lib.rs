//! fmgr Device Management API Provider
//!
//! Provider implementation for the device management API.
//!
//! ## Module Structure
//!
//! - `config` - Provider configuration (adom, device, vdom, import options, retries)
//! - `scope` - Resolution of the routing parameters addressing a resource
//! - `handlers` - Create/Read/Update/Delete/Import shared by all resources
//! - `provider` - FmgrProvider implementation
//! - `schemas` - Auto-generated resource definitions

pub mod config;
pub mod handlers;
pub mod provider;
pub mod schemas;
pub mod scope;

// Re-export main types
pub use config::{ConfigError, ProviderConfig};
pub use provider::FmgrProvider;
pub use schemas::ResourceDefinition;
pub use scope::{Scope, ScopeError};

use fmgr_client::DeviceClient;
use fmgr_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use fmgr_core::resource::ResourceData;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl<C: DeviceClient> Provider for FmgrProvider<C> {
    fn name(&self) -> &'static str {
        "fortimanager"
    }

    fn resource_types(&self) -> Vec<&dyn ResourceType> {
        self.definitions()
            .iter()
            .map(|d| d as &dyn ResourceType)
            .collect()
    }

    fn create(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        Box::pin(async move {
            let definition = self.definition(&data.resource_type)?;
            handlers::create(self.client(), self.config(), definition, data).await
        })
    }

    fn read(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        Box::pin(async move {
            let definition = self.definition(&data.resource_type)?;
            handlers::read(self.client(), self.config(), definition, data).await
        })
    }

    fn update(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        Box::pin(async move {
            let definition = self.definition(&data.resource_type)?;
            handlers::update(self.client(), self.config(), definition, data).await
        })
    }

    fn delete(&self, data: ResourceData) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        Box::pin(async move {
            let definition = self.definition(&data.resource_type)?;
            handlers::delete(self.client(), self.config(), definition, data).await
        })
    }

    fn import(
        &self,
        resource_type: &str,
        id: &str,
    ) -> BoxFuture<'_, ProviderResult<ResourceData>> {
        let resource_type = resource_type.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let definition = self.definition(&resource_type)?;
            handlers::import(self.client(), self.config(), definition, &id).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmgr_client::MemoryClient;
    use fmgr_core::resource::Value;

    fn provider() -> FmgrProvider<MemoryClient> {
        FmgrProvider::new(
            MemoryClient::new(),
            ProviderConfig {
                device_name: Some("fgt-01".to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn lists_all_resource_types() {
        let provider = provider();
        let names: Vec<&str> = provider.resource_types().iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"object_wirelesscontroller_wtpprofile"));
        assert!(provider.schema("system_global").is_some());
        assert!(provider.schema("object_firewall_policy").is_none());
    }

    #[tokio::test]
    async fn unknown_resource_type_is_an_error() {
        let provider = provider();
        let err = provider
            .create(ResourceData::new("object_firewall_policy"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Unknown resource type: object_firewall_policy");
    }

    #[tokio::test]
    async fn lifecycle_through_dyn_provider() {
        let provider: Box<dyn Provider> = Box::new(provider());
        let data = ResourceData::new("object_firewall_addrgrp")
            .with_attribute("name", Value::String("servers".to_string()))
            .with_attribute(
                "member",
                Value::List(vec![
                    Value::String("web".to_string()),
                    Value::String("db".to_string()),
                ]),
            );

        let created = provider.create(data).await.unwrap();
        assert_eq!(created.id(), "servers");
        assert_eq!(
            created.get("member"),
            Some(&Value::List(vec![
                Value::String("db".to_string()),
                Value::String("web".to_string()),
            ]))
        );

        let imported = provider
            .import("object_firewall_addrgrp", "servers")
            .await
            .unwrap();
        assert_eq!(imported.get("member"), created.get("member"));

        let deleted = provider.delete(created).await.unwrap();
        assert!(!deleted.has_id());
        let refreshed = provider
            .read(ResourceData::new("object_firewall_addrgrp").with_id("servers"))
            .await
            .unwrap();
        assert!(!refreshed.has_id());
    }
}
