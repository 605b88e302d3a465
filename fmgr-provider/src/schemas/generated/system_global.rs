//! system_global schema definition
//!
//! Auto-generated from resource description: system/global
//!
//! DO NOT EDIT MANUALLY - regenerate with fmgr-codegen

use super::{
    ResourceDefinition, device_name_attribute, dynamic_sort_subtable_attribute, enable_disable,
    enum_type,
};
use crate::scope::Scope;
use fmgr_client::Endpoint;
use fmgr_core::resource::Value;
use fmgr_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the definition of system_global (system/global)
pub fn system_global_definition() -> ResourceDefinition {
    ResourceDefinition {
        type_name: "system_global",
        display_name: "SystemGlobal",
        endpoint: Endpoint::singleton("/pm/config/device/{device}/global/system/global"),
        scope: Scope::Device,
        mkey: None,
        parents: &[],
        schema: ResourceSchema::new("system_global")
        .with_description("Configure global attributes.")
        .attribute(device_name_attribute())
        .attribute(dynamic_sort_subtable_attribute())
        .attribute(
            AttributeSchema::new("admin_https_redirect", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable redirection of HTTP administration access to HTTPS."),
        )
        .attribute(
            AttributeSchema::new("admin_port", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Administrative access port for HTTP."),
        )
        .attribute(
            AttributeSchema::new("admin_server_cert", AttributeType::String)
                .optional()
                .computed()
                .with_description("Server certificate that the FortiGate uses for HTTPS administrative connections."),
        )
        .attribute(
            AttributeSchema::new("admin_sport", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Administrative access port for HTTPS."),
        )
        .attribute(
            AttributeSchema::new("admintimeout", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Number of minutes before an idle administrator session times out."),
        )
        .attribute(
            AttributeSchema::new("alias", AttributeType::String)
                .optional()
                .computed()
                .with_description("Alias for your FortiGate unit."),
        )
        .attribute(
            AttributeSchema::new("gui_theme", enum_type(&["green", "red", "blue", "melongene", "mariner", "neutrino", "jade", "graphite", "dark-matter", "onyx", "eclipse"]))
                .optional()
                .computed()
                .with_description("Color scheme for the administration GUI."),
        )
        .attribute(
            AttributeSchema::new("hostname", AttributeType::String)
                .optional()
                .computed()
                .with_description("FortiGate unit's hostname."),
        )
        .attribute(
            AttributeSchema::new(
                "language",
                enum_type(&["english", "simch", "japanese", "korean", "spanish", "trach", "french", "portuguese"]),
            )
            .optional()
            .with_default(Value::String("english".to_string()))
            .with_description("GUI display language."),
        )
        .attribute(
            AttributeSchema::new("private_data_encryption", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable private data encryption using an AES 128-bit key or passpharse."),
        )
        .attribute(
            AttributeSchema::new("strong_crypto", enable_disable())
                .optional()
                .computed()
                .with_description("Enable to use strong encryption and only allow strong ciphers and digest for HTTPS/SSH/TLS/SSL functions."),
        )
        .attribute(
            AttributeSchema::new("switch_controller", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable switch controller feature."),
        )
        .attribute(
            AttributeSchema::new("timezone", AttributeType::String)
                .optional()
                .computed()
                .with_description("Timezone database name."),
        )
        .attribute(
            AttributeSchema::new("wireless_controller", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable the wireless controller feature to use the FortiGate unit to manage FortiAPs."),
        ),
    }
}
