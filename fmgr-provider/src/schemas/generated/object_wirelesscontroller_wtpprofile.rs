//! object_wirelesscontroller_wtpprofile schema definition
//!
//! Auto-generated from resource description: obj/wireless-controller/wtp-profile
//!
//! DO NOT EDIT MANUALLY - regenerate with fmgr-codegen

use super::{
    ResourceDefinition, adom_attribute, dynamic_sort_subtable_attribute, enable_disable,
    enum_type, scopetype_attribute, string_set,
};
use crate::scope::Scope;
use fmgr_client::Endpoint;
use fmgr_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

/// Returns the definition of object_wirelesscontroller_wtpprofile (obj/wireless-controller/wtp-profile)
pub fn object_wirelesscontroller_wtpprofile_definition() -> ResourceDefinition {
    ResourceDefinition {
        type_name: "object_wirelesscontroller_wtpprofile",
        display_name: "ObjectWirelessControllerWtpProfile",
        endpoint: Endpoint::table("/pm/config/{adom}/obj/wireless-controller/wtp-profile", "name"),
        scope: Scope::Adom,
        mkey: Some("name"),
        parents: &[],
        schema: ResourceSchema::new("object_wirelesscontroller_wtpprofile")
        .with_description("Configure WTP profiles or FortiAP profiles that define radio settings for manageable FortiAP platforms.")
        .attribute(scopetype_attribute())
        .attribute(adom_attribute())
        .attribute(dynamic_sort_subtable_attribute())
        .attribute(
            AttributeSchema::new("allowaccess", string_set())
                .optional()
                .computed()
                .with_description("Control management access to the managed WTP, FortiAP, or AP."),
        )
        .attribute(
            AttributeSchema::new("ap_country", AttributeType::String)
                .optional()
                .computed()
                .with_description("Country in which this WTP, FortiAP or AP will operate."),
        )
        .attribute(
            AttributeSchema::new("ble_profile", AttributeType::String)
                .optional()
                .computed()
                .with_description("Bluetooth Low Energy profile name."),
        )
        .attribute(
            AttributeSchema::new("comment", AttributeType::String)
                .optional()
                .with_description("Comment."),
        )
        .attribute(
            AttributeSchema::new("control_message_offload", string_set())
                .optional()
                .computed()
                .with_description("Enable/disable CAPWAP control message data channel offload."),
        )
        .attribute(
            AttributeSchema::new(
                "deny_mac_list",
                AttributeType::Table(
                    BlockSchema::new()
                        .with_mkey("id")
                        .attribute(
                            AttributeSchema::new("id", AttributeType::Int)
                                .optional()
                                .computed()
                                .with_description("ID."),
                        )
                        .attribute(
                            AttributeSchema::new("mac", types::mac_address())
                                .optional()
                                .computed()
                                .with_description("A WiFi device with this MAC address is denied access to this WTP, FortiAP or AP."),
                        ),
                ),
            )
            .optional()
            .with_description("List of MAC addresses that are denied access to this WTP, FortiAP, or AP."),
        )
        .attribute(
            AttributeSchema::new("dtls_policy", string_set())
                .optional()
                .computed()
                .with_description("WTP data channel DTLS policy."),
        )
        .attribute(
            AttributeSchema::new("energy_efficient_ethernet", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable use of energy efficient Ethernet on WTP."),
        )
        .attribute(
            AttributeSchema::new("handoff_rssi", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Minimum received signal strength indicator (RSSI) value for handoff."),
        )
        .attribute(
            AttributeSchema::new("handoff_sta_thresh", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Threshold value for AP handoff."),
        )
        .attribute(
            AttributeSchema::new(
                "lan",
                AttributeType::Block(
                    BlockSchema::new()
                        .attribute(
                            AttributeSchema::new(
                                "port_mode",
                                enum_type(&["offline", "bridge-to-wan", "bridge-to-ssid", "nat-to-wan"]),
                            )
                            .optional()
                            .computed()
                            .with_description("LAN port mode."),
                        )
                        .attribute(
                            AttributeSchema::new("port_ssid", AttributeType::String)
                                .optional()
                                .computed()
                                .with_description("Bridge LAN port to SSID."),
                        )
                        .attribute(
                            AttributeSchema::new(
                                "port1_mode",
                                enum_type(&["offline", "bridge-to-wan", "bridge-to-ssid", "nat-to-wan"]),
                            )
                            .optional()
                            .computed()
                            .with_description("LAN port 1 mode."),
                        )
                        .attribute(
                            AttributeSchema::new("port1_ssid", AttributeType::String)
                                .optional()
                                .computed()
                                .with_description("Bridge LAN port 1 to SSID."),
                        ),
                ),
            )
            .optional()
            .with_description("WTP LAN port mapping."),
        )
        .attribute(
            AttributeSchema::new(
                "lbs",
                AttributeType::Block(
                    BlockSchema::new()
                        .attribute(
                            AttributeSchema::new("aeroscout", enable_disable())
                                .optional()
                                .computed()
                                .with_description("Enable/disable AeroScout Real Time Location Service (RTLS) support."),
                        )
                        .attribute(
                            AttributeSchema::new("aeroscout_server_ip", types::ipv4())
                                .optional()
                                .computed()
                                .with_description("IP address of AeroScout server."),
                        )
                        .attribute(
                            AttributeSchema::new("aeroscout_server_port", AttributeType::Int)
                                .optional()
                                .computed()
                                .with_description("AeroScout server UDP listening port."),
                        )
                        .attribute(
                            AttributeSchema::new("ekahau_blink_mode", enable_disable())
                                .optional()
                                .computed()
                                .with_description("Enable/disable Ekahau blink mode (now known as AiRISTA Flow)."),
                        )
                        .attribute(
                            AttributeSchema::new("station_locate", enable_disable())
                                .optional()
                                .computed()
                                .with_description("Enable/disable client station locating services for all clients."),
                        ),
                ),
            )
            .optional()
            .with_description("Set various location based service (LBS) options."),
        )
        .attribute(
            AttributeSchema::new("led_schedules", string_set())
                .optional()
                .computed()
                .with_description("Recurring firewall schedules for illuminating LEDs on the FortiAP."),
        )
        .attribute(
            AttributeSchema::new("led_state", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable use of LEDs on WTP."),
        )
        .attribute(
            AttributeSchema::new("login_passwd", AttributeType::String)
                .optional()
                .sensitive()
                .with_description("Set the managed WTP, FortiAP, or AP's administrator password."),
        )
        .attribute(
            AttributeSchema::new("login_passwd_change", enum_type(&["no", "yes", "default"]))
                .optional()
                .computed()
                .with_description("Change or reset the administrator password of a managed WTP, FortiAP or AP."),
        )
        .attribute(
            AttributeSchema::new("max_clients", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Maximum number of stations (STAs) supported by the WTP."),
        )
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .with_description("WTP (or FortiAP or AP) profile name."),
        )
        .attribute(
            AttributeSchema::new(
                "platform",
                AttributeType::Block(
                    BlockSchema::new()
                        .attribute(
                            AttributeSchema::new("ddscan", enable_disable())
                                .optional()
                                .computed()
                                .with_description("Enable/disable use of one radio for dedicated dual-band scanning."),
                        )
                        .attribute(
                            AttributeSchema::new("mode", enum_type(&["dual-5G", "single-5G"]))
                                .optional()
                                .computed()
                                .with_description("Configure operation mode of 5G radios."),
                        )
                        .attribute(
                            AttributeSchema::new("type", AttributeType::String)
                                .optional()
                                .computed()
                                .with_description("WTP, FortiAP or AP platform type."),
                        ),
                ),
            )
            .optional()
            .with_description("WTP, FortiAP, or AP platform."),
        )
        .attribute(
            AttributeSchema::new("radio_1", AttributeType::Block(radio_block()))
                .optional()
                .with_description("Configuration options for radio 1."),
        )
        .attribute(
            AttributeSchema::new("radio_2", AttributeType::Block(radio_block()))
                .optional()
                .with_description("Configuration options for radio 2."),
        )
        .attribute(
            AttributeSchema::new(
                "split_tunneling_acl",
                AttributeType::Table(
                    BlockSchema::new()
                        .with_mkey("id")
                        .attribute(
                            AttributeSchema::new("dest_ip", types::ipv4_netmask())
                                .optional()
                                .computed()
                                .with_description("Destination IP and mask for the split-tunneling subnet."),
                        )
                        .attribute(
                            AttributeSchema::new("id", AttributeType::Int)
                                .optional()
                                .computed()
                                .with_description("ID."),
                        ),
                ),
            )
            .optional()
            .with_description("Split tunneling ACL filter list."),
        )
        .attribute(
            AttributeSchema::new("split_tunneling_acl_local_ap_subnet", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable automatically adding local subnetwork of FortiAP to split-tunneling ACL."),
        )
        .attribute(
            AttributeSchema::new("split_tunneling_acl_path", enum_type(&["tunnel", "local"]))
                .optional()
                .computed()
                .with_description("Split tunneling ACL path is local/tunnel."),
        )
        .attribute(
            AttributeSchema::new("tun_mtu_uplink", AttributeType::Int)
                .optional()
                .computed()
                .with_description("The maximum transmission unit (MTU) of uplink CAPWAP tunnel."),
        ),
    }
}

/// Shared attributes of the radio_1 and radio_2 blocks
fn radio_block() -> BlockSchema {
    BlockSchema::new()
        .attribute(
            AttributeSchema::new("auto_power_level", enable_disable())
                .optional()
                .computed()
                .with_description("Enable/disable automatic power-level adjustment to prevent co-channel interference."),
        )
        .attribute(
            AttributeSchema::new("band", AttributeType::String)
                .optional()
                .computed()
                .with_description("WiFi band that Radio operates on."),
        )
        .attribute(
            AttributeSchema::new("channel", string_set())
                .optional()
                .computed()
                .with_description("Selected list of wireless radio channels."),
        )
        .attribute(
            AttributeSchema::new(
                "mode",
                enum_type(&["disabled", "ap", "monitor", "sniffer", "sam"]),
            )
            .optional()
            .computed()
            .with_description("Mode of radio."),
        )
        .attribute(
            AttributeSchema::new("power_level", AttributeType::Int)
                .optional()
                .computed()
                .with_description("Radio EIRP power level as a percentage of the maximum EIRP power (0 - 100)."),
        )
        .attribute(
            AttributeSchema::new("vap_all", enum_type(&["disable", "enable", "tunnel", "bridge", "manual"]))
                .optional()
                .computed()
                .with_description("Configure method for assigning SSIDs to this FortiAP."),
        )
        .attribute(
            AttributeSchema::new("vaps", string_set())
                .optional()
                .computed()
                .with_description("Manually selected list of Virtual Access Points (VAPs)."),
        )
}
