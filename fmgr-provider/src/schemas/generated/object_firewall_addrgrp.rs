//! object_firewall_addrgrp schema definition
//!
//! Auto-generated from resource description: obj/firewall/addrgrp
//!
//! DO NOT EDIT MANUALLY - regenerate with fmgr-codegen

use super::{
    ResourceDefinition, adom_attribute, dynamic_sort_subtable_attribute, enable_disable,
    enum_type, scopetype_attribute, string_set,
};
use crate::scope::Scope;
use fmgr_client::Endpoint;
use fmgr_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the definition of object_firewall_addrgrp (obj/firewall/addrgrp)
pub fn object_firewall_addrgrp_definition() -> ResourceDefinition {
    ResourceDefinition {
        type_name: "object_firewall_addrgrp",
        display_name: "ObjectFirewallAddrgrp",
        endpoint: Endpoint::table("/pm/config/{adom}/obj/firewall/addrgrp", "name"),
        scope: Scope::Adom,
        mkey: Some("name"),
        parents: &[],
        schema: ResourceSchema::new("object_firewall_addrgrp")
        .with_description("Configure IPv4 address groups.")
        .attribute(scopetype_attribute())
        .attribute(adom_attribute())
        .attribute(dynamic_sort_subtable_attribute())
        .attribute(
            AttributeSchema::new("allow_routing", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable use of this group in the static route configuration."),
        )
        .attribute(
            AttributeSchema::new("color", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Color of icon on the GUI."),
        )
        .attribute(
            AttributeSchema::new("comment", AttributeType::String)
                .optional()
                .with_description("Comment."),
        )
        .attribute(
            AttributeSchema::new("exclude", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable address exclusion."),
        )
        .attribute(
            AttributeSchema::new("exclude_member", string_set())
                .optional()
                .computed()
                .with_description("Address exclusion member."),
        )
        .attribute(
            AttributeSchema::new("member", string_set())
                .optional()
                .computed()
                .with_description("Address objects contained within the group."),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .with_description("Address group name."),
        )
        .attribute(
            AttributeSchema::new("type", enum_type(&["default", "array", "folder"]))
                .optional()
                .computed()
                .with_description("Address group type."),
        )
        .attribute(
            AttributeSchema::new("uuid", AttributeType::String)
                .computed()
                .with_description("Universally Unique Identifier (read-only)"),
        ),
    }
}
