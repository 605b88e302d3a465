//! system_clustersync_sessionsyncfilter schema definition
//!
//! Auto-generated from resource description: system/cluster-sync/session-sync-filter
//!
//! DO NOT EDIT MANUALLY - regenerate with fmgr-codegen

use super::{
    ResourceDefinition, device_name_attribute, device_vdom_attribute,
    dynamic_sort_subtable_attribute,
};
use crate::scope::Scope;
use fmgr_client::Endpoint;
use fmgr_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

/// Returns the definition of system_clustersync_sessionsyncfilter (system/cluster-sync/session-sync-filter)
pub fn system_clustersync_sessionsyncfilter_definition() -> ResourceDefinition {
    ResourceDefinition {
        type_name: "system_clustersync_sessionsyncfilter",
        display_name: "SystemClusterSyncSessionSyncFilter",
        endpoint: Endpoint::singleton(
            "/pm/config/device/{device}/vdom/{vdom}/system/cluster-sync/{cluster-sync}/session-sync-filter",
        ),
        scope: Scope::Vdom,
        mkey: None,
        parents: &[("cluster_sync", "cluster-sync")],
        schema: ResourceSchema::new("system_clustersync_sessionsyncfilter")
        .with_description("Add one or more filters if you only want to synchronize some sessions.")
        .attribute(device_name_attribute())
        .attribute(device_vdom_attribute())
        .attribute(dynamic_sort_subtable_attribute())
        .attribute(
            AttributeSchema::new("cluster_sync", AttributeType::String)
                .required()
                .local_only()
                .with_description("Cluster Sync."),
        )
        .attribute(
            AttributeSchema::new(
                "custom_service",
                AttributeType::Table(
                    BlockSchema::new()
                        .with_mkey("id")
                        .attribute(
                            AttributeSchema::new("dst_port_range", types::port_range())
                                .optional()
                                .computed()
                                .with_description("Custom service destination port range."),
                        )
                        .attribute(
                            AttributeSchema::new("id", AttributeType::Int)
                                .optional()
                                .computed()
                                .with_description("Custom service ID."),
                        )
                        .attribute(
                            AttributeSchema::new("src_port_range", types::port_range())
                                .optional()
                                .computed()
                                .with_description("Custom service source port range."),
                        ),
                ),
            )
            .optional()
            .with_description("Only sessions using these custom services are synchronized."),
        )
        .attribute(
            AttributeSchema::new("dstaddr", types::ipv4_netmask())
                .optional()
                .computed()
                .with_description("Only sessions to this IPv4 address are synchronized."),
        )
        .attribute(
            AttributeSchema::new("dstaddr6", AttributeType::String)
                .optional()
                .computed()
                .with_description("Only sessions to this IPv6 address are synchronized."),
        )
        .attribute(
            AttributeSchema::new("dstintf", AttributeType::String)
                .optional()
                .computed()
                .with_description("Only sessions to this interface are synchronized."),
        )
        .attribute(
            AttributeSchema::new("srcaddr", types::ipv4_netmask())
                .optional()
                .computed()
                .with_description("Only sessions from this IPv4 address are synchronized."),
        )
        .attribute(
            AttributeSchema::new("srcaddr6", AttributeType::String)
                .optional()
                .computed()
                .with_description("Only sessions from this IPv6 address are synchronized."),
        )
        .attribute(
            AttributeSchema::new("srcintf", AttributeType::String)
                .optional()
                .computed()
                .with_description("Only sessions from this interface are synchronized."),
        ),
    }
}
