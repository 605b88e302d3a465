//! object_wirelesscontroller_wtpprofile_denymaclist schema definition
//!
//! Auto-generated from resource description: obj/wireless-controller/wtp-profile/deny-mac-list
//!
//! DO NOT EDIT MANUALLY - regenerate with fmgr-codegen

use super::{ResourceDefinition, adom_attribute, dynamic_sort_subtable_attribute, scopetype_attribute};
use crate::scope::Scope;
use fmgr_client::Endpoint;
use fmgr_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

/// Returns the definition of object_wirelesscontroller_wtpprofile_denymaclist (obj/wireless-controller/wtp-profile/deny-mac-list)
pub fn object_wirelesscontroller_wtpprofile_denymaclist_definition() -> ResourceDefinition {
    ResourceDefinition {
        type_name: "object_wirelesscontroller_wtpprofile_denymaclist",
        display_name: "ObjectWirelessControllerWtpProfileDenyMacList",
        endpoint: Endpoint::table(
            "/pm/config/{adom}/obj/wireless-controller/wtp-profile/{wtp-profile}/deny-mac-list",
            "id",
        ),
        scope: Scope::Adom,
        mkey: Some("id"),
        parents: &[("wtp_profile", "wtp-profile")],
        schema: ResourceSchema::new("object_wirelesscontroller_wtpprofile_denymaclist")
        .with_description("List of MAC addresses that are denied access to this WTP, FortiAP, or AP.")
        .attribute(scopetype_attribute())
        .attribute(adom_attribute())
        .attribute(dynamic_sort_subtable_attribute())
        .attribute(
            AttributeSchema::new("wtp_profile", AttributeType::String)
                .required()
                .local_only()
                .with_description("Wtp Profile."),
        )
        .attribute(
            AttributeSchema::new("id", AttributeType::Int)
                .required()
                .with_description("ID."),
        )
        .attribute(
            AttributeSchema::new("mac", types::mac_address())
                .optional()
                .computed()
                .with_description("A WiFi device with this MAC address is denied access to this WTP, FortiAP or AP."),
        ),
    }
}
