//! object_firewall_address schema definition
//!
//! Auto-generated from resource description: obj/firewall/address
//!
//! DO NOT EDIT MANUALLY - regenerate with fmgr-codegen

use super::{
    ResourceDefinition, adom_attribute, dynamic_sort_subtable_attribute, enable_disable,
    enum_type, scopetype_attribute, string_set,
};
use crate::scope::Scope;
use fmgr_client::Endpoint;
use fmgr_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

/// Returns the definition of object_firewall_address (obj/firewall/address)
pub fn object_firewall_address_definition() -> ResourceDefinition {
    ResourceDefinition {
        type_name: "object_firewall_address",
        display_name: "ObjectFirewallAddress",
        endpoint: Endpoint::table("/pm/config/{adom}/obj/firewall/address", "name"),
        scope: Scope::Adom,
        mkey: Some("name"),
        parents: &[],
        schema: ResourceSchema::new("object_firewall_address")
        .with_description("Configure IPv4 addresses.")
        .attribute(scopetype_attribute())
        .attribute(adom_attribute())
        .attribute(dynamic_sort_subtable_attribute())
        .attribute(
            AttributeSchema::new("allow_routing", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable use of this address in the static route configuration."),
        )
        .attribute(
            AttributeSchema::new("associated_interface", string_set())
                .optional()
                .computed()
                .with_description("Network interface associated with address."),
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
            AttributeSchema::new("country", AttributeType::String)
                .optional()
                .computed()
                .with_description("IP addresses associated to a specific country."),
        )
        .attribute(
            AttributeSchema::new("end_ip", types::ipv4())
                .optional()
                .computed()
                .with_description("Final IP address (inclusive) in the range for the address."),
        )
        .attribute(
            AttributeSchema::new("fqdn", AttributeType::String)
                .optional()
                .computed()
                .with_description("Fully Qualified Domain Name address."),
        )
        .attribute(
            AttributeSchema::new("macaddr", string_set())
                .optional()
                .computed()
                .with_description("Multiple MAC address ranges."),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .with_description("Address name."),
        )
        .attribute(
            AttributeSchema::new("start_ip", types::ipv4())
                .optional()
                .computed()
                .with_description("First IP address (inclusive) in the range for the address."),
        )
        .attribute(
            AttributeSchema::new("subnet", AttributeType::List(Box::new(AttributeType::String)))
                .optional()
                .computed()
                .with_description("IP address and subnet mask of address."),
        )
        .attribute(
            AttributeSchema::new(
                "tagging",
                AttributeType::Table(
                    BlockSchema::new()
                        .with_mkey("name")
                        .attribute(
                            AttributeSchema::new("category", AttributeType::String)
                                .optional()
                                .with_description("Tag category."),
                        )
                        .attribute(
                            AttributeSchema::new("name", AttributeType::String)
                                .optional()
                                .with_description("Tagging entry name."),
                        )
                        .attribute(
                            AttributeSchema::new("tags", string_set())
                                .optional()
                                .with_description("Tags."),
                        ),
                ),
            )
            .optional()
            .with_description("Config object tagging."),
        )
        .attribute(
            AttributeSchema::new(
                "type",
                enum_type(&[
                    "ipmask",
                    "iprange",
                    "fqdn",
                    "wildcard",
                    "geography",
                    "wildcard-fqdn",
                    "dynamic",
                    "interface-subnet",
                    "mac",
                ]),
            )
            .optional()
            .computed()
            .with_description("Type of address."),
        )
        .attribute(
            AttributeSchema::new("uuid", AttributeType::String)
                .computed()
                .with_description("Universally Unique Identifier (read-only)"),
        )
        .attribute(
            AttributeSchema::new("visibility", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable address visibility in the GUI."),
        ),
    }
}
