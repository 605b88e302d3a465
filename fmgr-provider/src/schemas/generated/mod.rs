//! Auto-generated device API resource schemas
//!
//! DO NOT EDIT MANUALLY - regenerate each resource module with:
//!   cargo run -p fmgr-codegen -- --file <resource.json> --output fmgr-provider/src/schemas/generated/<resource>.rs

use fmgr_client::Endpoint;
use fmgr_core::provider::ResourceType;
use fmgr_core::resource::{ResourceData, Value};
use fmgr_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use crate::scope::Scope;

/// Resource definition
///
/// Combines the generated ResourceSchema with the routing metadata used to
/// address the resource on the device.
pub struct ResourceDefinition {
    /// Resource type name (e.g., "object_firewall_address")
    pub type_name: &'static str,
    /// Name used in error messages and as the id of singletons (e.g., "ObjectFirewallAddress")
    pub display_name: &'static str,
    /// URL template and API key field
    pub endpoint: Endpoint,
    pub scope: Scope,
    /// Schema attribute holding the row key; `None` for singletons
    pub mkey: Option<&'static str>,
    /// Parent keys as (schema attribute, routing parameter)
    pub parents: &'static [(&'static str, &'static str)],
    /// The resource schema with attribute definitions
    pub schema: ResourceSchema,
}

impl ResourceDefinition {
    pub fn is_singleton(&self) -> bool {
        self.mkey.is_none()
    }

    /// Identifier of the resource described by `data`
    pub fn resource_id(&self, data: &ResourceData) -> Option<String> {
        match self.mkey {
            Some(mkey) => data.get_string_key(mkey),
            None => Some(self.display_name.to_string()),
        }
    }
}

impl ResourceType for ResourceDefinition {
    fn name(&self) -> &str {
        self.type_name
    }

    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }
}

/// Enum of fixed string values
pub fn enum_type(values: &[&str]) -> AttributeType {
    AttributeType::Enum(values.iter().map(|v| v.to_string()).collect())
}

/// The ubiquitous "enable"/"disable" switch
pub fn enable_disable() -> AttributeType {
    enum_type(&["disable", "enable"])
}

/// Set of strings
pub fn string_set() -> AttributeType {
    AttributeType::Set(Box::new(AttributeType::String))
}

/// `scopetype` attribute of adom-scoped resources
pub fn scopetype_attribute() -> AttributeSchema {
    AttributeSchema::new("scopetype", enum_type(&["inherit", "adom", "global"]))
        .optional()
        .local_only()
        .with_default(Value::String("inherit".to_string()))
        .with_description("Where the adom is taken from: inherit (provider), adom (the adom attribute) or global.")
}

/// `adom` attribute of adom-scoped resources
pub fn adom_attribute() -> AttributeSchema {
    AttributeSchema::new("adom", AttributeType::String)
        .optional()
        .local_only()
        .with_description("Adom, used when scopetype is \"adom\".")
}

/// `device_name` attribute of device-scoped resources
pub fn device_name_attribute() -> AttributeSchema {
    AttributeSchema::new("device_name", AttributeType::String)
        .optional()
        .local_only()
        .with_description("Device to configure. Defaults to the provider's device_name.")
}

/// `device_vdom` attribute of vdom-scoped resources
pub fn device_vdom_attribute() -> AttributeSchema {
    AttributeSchema::new("device_vdom", AttributeType::String)
        .optional()
        .local_only()
        .with_description("Vdom of the device. Defaults to the provider's device_vdom.")
}

/// `dynamic_sort_subtable` attribute carried by every resource
pub fn dynamic_sort_subtable_attribute() -> AttributeSchema {
    AttributeSchema::new("dynamic_sort_subtable", enum_type(&["true", "false"]))
        .optional()
        .local_only()
        .with_default(Value::String("false".to_string()))
        .with_description("Sort table rows by their key when reading.")
}

pub mod object_firewall_address;
pub mod object_firewall_addrgrp;
pub mod object_wirelesscontroller_wtpprofile;
pub mod object_wirelesscontroller_wtpprofile_denymaclist;
pub mod system_clustersync;
pub mod system_clustersync_sessionsyncfilter;
pub mod system_global;

/// Returns all generated resource definitions
pub fn definitions() -> Vec<ResourceDefinition> {
    vec![
        object_firewall_address::object_firewall_address_definition(),
        object_firewall_addrgrp::object_firewall_addrgrp_definition(),
        object_wirelesscontroller_wtpprofile::object_wirelesscontroller_wtpprofile_definition(),
        object_wirelesscontroller_wtpprofile_denymaclist::object_wirelesscontroller_wtpprofile_denymaclist_definition(),
        system_clustersync::system_clustersync_definition(),
        system_clustersync_sessionsyncfilter::system_clustersync_sessionsyncfilter_definition(),
        system_global::system_global_definition(),
    ]
}
