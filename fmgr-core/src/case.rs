//! Case conversion between schema attribute names and API keys
//!
//! Schema attributes use snake_case (e.g., `deny_mac_list`)
//! The device API uses kebab-case (e.g., `deny-mac-list`)

/// Convert a snake_case schema name to its kebab-case API key
/// e.g., "split_tunneling_acl" -> "split-tunneling-acl"
pub fn to_api_name(name: &str) -> String {
    name.replace('_', "-")
}

/// Convert a kebab-case API key to its snake_case schema name
/// e.g., "split-tunneling-acl" -> "split_tunneling_acl"
pub fn to_schema_name(key: &str) -> String {
    key.replace('-', "_")
}
