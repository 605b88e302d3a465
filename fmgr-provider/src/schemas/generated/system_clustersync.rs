//! system_clustersync schema definition
//!
//! Auto-generated from resource description: system/cluster-sync
//!
//! DO NOT EDIT MANUALLY - regenerate with fmgr-codegen

use super::{
    ResourceDefinition, device_name_attribute, device_vdom_attribute,
    dynamic_sort_subtable_attribute, enable_disable, string_set,
};
use crate::scope::Scope;
use fmgr_client::Endpoint;
use fmgr_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

/// Returns the definition of system_clustersync (system/cluster-sync)
pub fn system_clustersync_definition() -> ResourceDefinition {
    ResourceDefinition {
        type_name: "system_clustersync",
        display_name: "SystemClusterSync",
        endpoint: Endpoint::table("/pm/config/device/{device}/vdom/{vdom}/system/cluster-sync", "sync-id"),
        scope: Scope::Vdom,
        mkey: Some("sync_id"),
        parents: &[],
        schema: ResourceSchema::new("system_clustersync")
        .with_description("Configure FortiGate Session Life Support Protocol (FGSP) session synchronization.")
        .attribute(device_name_attribute())
        .attribute(device_vdom_attribute())
        .attribute(dynamic_sort_subtable_attribute())
        .attribute(
            AttributeSchema::new("down_intfs_before_sess_sync", string_set())
                .optional()
                .computed()
                .with_description("List of interfaces to be turned down before session synchronization is complete."),
        )
        .attribute(
            AttributeSchema::new("hb_interval", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Heartbeat interval (1 - 20 sec)."),
        )
        .attribute(
            AttributeSchema::new("hb_lost_threshold", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Lost heartbeat threshold (1 - 10)."),
        )
        .attribute(
            AttributeSchema::new("ike_heartbeat_interval", AttributeType::Int)
                .optional()
                .computed()
                .with_description("IKE heartbeat interval (1 - 60 secs)."),
        )
        .attribute(
            AttributeSchema::new("ike_monitor", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable IKE HA monitor."),
        )
        .attribute(
            AttributeSchema::new("ike_monitor_interval", AttributeType::Int)
                .optional()
                .computed()
                .with_description("IKE HA monitor interval (10 - 300 secs)."),
        )
        .attribute(
            AttributeSchema::new("ipsec_tunnel_sync", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable IPsec tunnel synchronization."),
        )
        .attribute(
            AttributeSchema::new("peerip", types::ipv4())
                .optional()
                .computed()
                .with_description("IP address of the interface on the peer unit that is used for the session synchronization link."),
        )
        .attribute(
            AttributeSchema::new("peervd", AttributeType::String)
                .optional()
                .computed()
                .with_description("VDOM that contains the session synchronization link interface on the peer unit."),
        )
        .attribute(
            AttributeSchema::new("secondary_add_ipsec_routes", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable IKE route announcement on the backup unit."),
        )
        .attribute(
            AttributeSchema::new(
                "session_sync_filter",
                AttributeType::Block(
                    BlockSchema::new()
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
                ),
            )
            .optional()
            .with_description("Add one or more filters if you only want to synchronize some sessions."),
        )
        .attribute(
            AttributeSchema::new("slave_add_ike_routes", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable IKE route announcement on the backup unit."),
        )
        .attribute(
            AttributeSchema::new("sync_id", AttributeType::Int)
                .required()
                .with_description("Sync ID."),
        )
        .attribute(
            AttributeSchema::new("syncvd", string_set())
                .optional()
                .computed()
                .with_description("Sessions from these VDOMs are synchronized using this session synchronization configuration."),
        ),
    }
}
