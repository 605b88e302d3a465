//! Resource Description to fmgr Schema Code Generator
//!
//! Generates a resource definition module for fmgr-provider from a JSON
//! description of one API resource.
//!
//! Usage:
//!   # Generate from file
//!   fmgr-codegen --file system-global.json \
//!     --output fmgr-provider/src/schemas/generated/system_global.rs
//!
//!   # Generate from stdin
//!   cat system-global.json | fmgr-codegen
//!
//! Description format:
//!
//! ```json
//! {
//!   "path": "obj/wireless-controller/wtp-profile/deny-mac-list",
//!   "url": "/pm/config/{adom}/obj/wireless-controller/wtp-profile/{wtp-profile}/deny-mac-list",
//!   "scope": "adom",
//!   "mkey": "id",
//!   "description": "List of MAC addresses that are denied access.",
//!   "attributes": {
//!     "id": { "type": "integer", "description": "ID." },
//!     "mac": { "type": "mac", "computed": true }
//!   }
//! }
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use heck::{ToSnakeCase, ToTitleCase, ToUpperCamelCase};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{self, Read};

#[derive(Parser, Debug)]
#[command(name = "fmgr-codegen")]
#[command(about = "Generate fmgr resource definitions from API resource descriptions")]
struct Args {
    /// Input file (reads from stdin if not specified)
    #[arg(long)]
    file: Option<String>,

    /// Output file (writes to stdout if not specified)
    #[arg(long, short)]
    output: Option<String>,
}

/// Description of one API resource
#[derive(Debug, Deserialize)]
struct ResourceDescription {
    /// API path below the scope prefix (e.g., "obj/firewall/address")
    path: String,
    /// URL template (e.g., "/pm/config/{adom}/obj/firewall/address")
    url: String,
    scope: ScopeKind,
    /// API key of the row key; absent for singletons
    #[serde(default)]
    mkey: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Overrides the name derived from `path`
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    attributes: BTreeMap<String, AttributeDescription>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ScopeKind {
    Adom,
    Device,
    Vdom,
    Global,
}

impl ScopeKind {
    fn variant(self) -> &'static str {
        match self {
            ScopeKind::Adom => "Scope::Adom",
            ScopeKind::Device => "Scope::Device",
            ScopeKind::Vdom => "Scope::Vdom",
            ScopeKind::Global => "Scope::Global",
        }
    }

    /// Helpers declaring the routing attributes of this scope
    fn attributes(self) -> &'static [&'static str] {
        match self {
            ScopeKind::Adom => &["scopetype_attribute", "adom_attribute"],
            ScopeKind::Device => &["device_name_attribute"],
            ScopeKind::Vdom => &["device_name_attribute", "device_vdom_attribute"],
            ScopeKind::Global => &[],
        }
    }
}

/// Description of one attribute, keyed by its API key
#[derive(Debug, Deserialize)]
struct AttributeDescription {
    /// string, integer, boolean, enum, ipv4, ipv4-netmask, mac, port-range,
    /// list, set, block or table
    #[serde(rename = "type")]
    attr_type: String,
    /// Allowed values of an enum
    #[serde(default)]
    options: Vec<String>,
    /// Element type of a list or set
    #[serde(default)]
    items: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    computed: bool,
    #[serde(default)]
    sensitive: bool,
    #[serde(default)]
    default: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
    /// Row key of a table
    #[serde(default)]
    mkey: Option<String>,
    /// Attributes of a block or table row
    #[serde(default)]
    attributes: BTreeMap<String, AttributeDescription>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let description_json = if let Some(file_path) = &args.file {
        std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {}", file_path))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    };

    let description: ResourceDescription =
        serde_json::from_str(&description_json).context("Failed to parse resource description")?;

    let code = generate_definition_code(&description)?;

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &code)
            .with_context(|| format!("Failed to write to: {}", output_path))?;
        eprintln!("Generated: {}", output_path);
    } else {
        print!("{}", code);
    }

    Ok(())
}

/// obj/wireless-controller/wtp-profile -> object_wirelesscontroller_wtpprofile
fn resource_name(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment {
            "obj" => "object".to_string(),
            other => other.replace(['-', '_'], ""),
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// obj/wireless-controller/wtp-profile -> ObjectWirelessControllerWtpProfile
fn display_name(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment {
            "obj" => "Object".to_string(),
            other => other.to_upper_camel_case(),
        })
        .collect()
}

/// Placeholders of the URL template naming a parent object
fn parent_keys(url: &str) -> Vec<String> {
    url.split('{')
        .skip(1)
        .filter_map(|part| part.split_once('}').map(|(name, _)| name))
        .filter(|name| !matches!(*name, "adom" | "device" | "vdom"))
        .map(str::to_string)
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
}

fn generate_definition_code(resource: &ResourceDescription) -> Result<String> {
    let name = resource
        .name
        .clone()
        .unwrap_or_else(|| resource_name(&resource.path));
    let display = resource
        .display_name
        .clone()
        .unwrap_or_else(|| display_name(&resource.path));
    let parents = parent_keys(&resource.url);

    let mkey = match &resource.mkey {
        Some(key) => {
            if !resource.attributes.contains_key(key) {
                bail!("mkey '{}' is not an attribute of {}", key, resource.path);
            }
            Some(key.as_str())
        }
        None => None,
    };

    // Attribute chain first, so imports can be derived from what it uses
    let mut body = String::new();
    for helper in resource.scope.attributes() {
        body.push_str(&format!("        .attribute({}())\n", helper));
    }
    body.push_str("        .attribute(dynamic_sort_subtable_attribute())\n");
    for parent in &parents {
        body.push_str(&format!(
            "        .attribute(\n            AttributeSchema::new(\"{}\", AttributeType::String)\n                .required()\n                .local_only()\n                .with_description(\"{}.\"),\n        )\n",
            parent.to_snake_case(),
            parent.to_title_case()
        ));
    }
    for (api_key, attr) in &resource.attributes {
        let attribute = attribute_code(api_key, attr, mkey == Some(api_key.as_str()), 2)
            .with_context(|| format!("Invalid attribute '{}'", api_key))?;
        body.push_str(&format!("        .attribute(\n{}\n        )\n", attribute));
    }
    // Last attribute closes the struct literal field
    if body.ends_with(")\n") {
        body.truncate(body.len() - 1);
        body.push_str(",\n");
    }

    let mut helpers = vec!["ResourceDefinition".to_string()];
    for helper in [
        "adom_attribute",
        "device_name_attribute",
        "device_vdom_attribute",
        "dynamic_sort_subtable_attribute",
        "enable_disable",
        "enum_type",
        "scopetype_attribute",
        "string_set",
    ] {
        if body.contains(&format!("{}()", helper)) || body.contains(&format!("{}(&", helper)) {
            helpers.push(helper.to_string());
        }
    }

    let mut schema_imports = vec!["AttributeSchema"];
    if body.contains("AttributeType::") {
        schema_imports.push("AttributeType");
    }
    if body.contains("BlockSchema::") {
        schema_imports.push("BlockSchema");
    }
    schema_imports.push("ResourceSchema");
    if body.contains("types::") {
        schema_imports.push("types");
    }

    let mut code = format!(
        r#"//! {name} schema definition
//!
//! Auto-generated from resource description: {path}
//!
//! DO NOT EDIT MANUALLY - regenerate with fmgr-codegen

use super::{{{helpers}}};
use crate::scope::Scope;
use fmgr_client::Endpoint;
"#,
        name = name,
        path = resource.path,
        helpers = helpers.join(", "),
    );
    if body.contains("Value::") {
        code.push_str("use fmgr_core::resource::Value;\n");
    }
    code.push_str(&format!(
        "use fmgr_core::schema::{{{}}};\n\n",
        schema_imports.join(", ")
    ));

    let endpoint = match mkey {
        Some(key) => format!("Endpoint::table(\"{}\", \"{}\")", resource.url, key),
        None => format!("Endpoint::singleton(\"{}\")", resource.url),
    };
    let mkey_field = match mkey {
        Some(key) => format!("Some(\"{}\")", key.to_snake_case()),
        None => "None".to_string(),
    };
    let parents_field = parents
        .iter()
        .map(|p| format!("(\"{}\", \"{}\")", p.to_snake_case(), p))
        .collect::<Vec<_>>()
        .join(", ");

    code.push_str(&format!(
        r#"/// Returns the definition of {name} ({path})
pub fn {name}_definition() -> ResourceDefinition {{
    ResourceDefinition {{
        type_name: "{name}",
        display_name: "{display}",
        endpoint: {endpoint},
        scope: {scope},
        mkey: {mkey_field},
        parents: &[{parents_field}],
        schema: ResourceSchema::new("{name}")
"#,
        name = name,
        path = resource.path,
        display = display,
        endpoint = endpoint,
        scope = resource.scope.variant(),
        mkey_field = mkey_field,
        parents_field = parents_field,
    ));
    if let Some(desc) = &resource.description {
        code.push_str(&format!("        .with_description(\"{}\")\n", escape(desc)));
    }
    code.push_str(&body);
    code.push_str("    }\n}\n");

    Ok(code)
}

/// `AttributeSchema::new(..)` chain for one attribute, indented by `depth` levels
fn attribute_code(
    api_key: &str,
    attr: &AttributeDescription,
    is_mkey: bool,
    depth: usize,
) -> Result<String> {
    let indent = "    ".repeat(depth + 1);
    let name = api_key.to_snake_case();
    let attr_type = attribute_type(attr, depth)?;

    let mut code = format!("{}AttributeSchema::new(\"{}\", {})", indent, name, attr_type);
    let chain = format!("\n{}    ", indent);

    if is_mkey || attr.required {
        code.push_str(&format!("{}.required()", chain));
    } else {
        code.push_str(&format!("{}.optional()", chain));
        let is_nested = matches!(attr.attr_type.as_str(), "block" | "table");
        if attr.computed && attr.default.is_none() && !is_nested {
            code.push_str(&format!("{}.computed()", chain));
        }
    }
    if attr.sensitive {
        code.push_str(&format!("{}.sensitive()", chain));
    }
    if name.replace('_', "-") != api_key {
        code.push_str(&format!("{}.with_api_name(\"{}\")", chain, api_key));
    }
    if let Some(default) = &attr.default {
        code.push_str(&format!("{}.with_default({})", chain, default_value(default)?));
    }
    if let Some(desc) = &attr.description {
        code.push_str(&format!("{}.with_description(\"{}\")", chain, escape(desc)));
    }
    code.push(',');

    Ok(code)
}

fn attribute_type(attr: &AttributeDescription, depth: usize) -> Result<String> {
    let code = match attr.attr_type.as_str() {
        "string" => "AttributeType::String".to_string(),
        "integer" => "AttributeType::Int".to_string(),
        "boolean" => "AttributeType::Bool".to_string(),
        "ipv4" => "types::ipv4()".to_string(),
        "ipv4-netmask" => "types::ipv4_netmask()".to_string(),
        "mac" => "types::mac_address()".to_string(),
        "port-range" => "types::port_range()".to_string(),
        "enum" => {
            if attr.options.is_empty() {
                bail!("enum without options");
            }
            let mut options = attr.options.clone();
            options.sort();
            if options == ["disable", "enable"] {
                "enable_disable()".to_string()
            } else {
                let values: Vec<String> = attr.options.iter().map(|v| format!("\"{}\"", v)).collect();
                format!("enum_type(&[{}])", values.join(", "))
            }
        }
        "list" => format!(
            "AttributeType::List(Box::new({}))",
            item_type(attr.items.as_deref())?
        ),
        "set" => match attr.items.as_deref() {
            None | Some("string") => "string_set()".to_string(),
            other => format!("AttributeType::Set(Box::new({}))", item_type(other)?),
        },
        "block" | "table" => {
            let indent = "    ".repeat(depth + 2);
            let mut block = format!("\n{}BlockSchema::new()", indent);
            if attr.attr_type == "table" {
                let mkey = attr.mkey.as_deref().unwrap_or("id");
                block.push_str(&format!("\n{}    .with_mkey(\"{}\")", indent, mkey.to_snake_case()));
            }
            for (api_key, nested) in &attr.attributes {
                let nested_code = attribute_code(api_key, nested, false, depth + 3)
                    .with_context(|| format!("Invalid attribute '{}'", api_key))?;
                let nested_code = nested_code.trim_end_matches(',');
                block.push_str(&format!(
                    "\n{}    .attribute(\n{}\n{}    )",
                    indent, nested_code, indent
                ));
            }
            let variant = if attr.attr_type == "table" { "Table" } else { "Block" };
            format!("AttributeType::{}({}\n{})", variant, block, "    ".repeat(depth + 1))
        }
        other => bail!("unsupported attribute type '{}'", other),
    };
    Ok(code)
}

fn item_type(items: Option<&str>) -> Result<String> {
    Ok(match items {
        None | Some("string") => "AttributeType::String".to_string(),
        Some("integer") => "AttributeType::Int".to_string(),
        Some("ipv4") => "types::ipv4()".to_string(),
        Some(other) => bail!("unsupported item type '{}'", other),
    })
}

fn default_value(value: &serde_json::Value) -> Result<String> {
    Ok(match value {
        serde_json::Value::String(s) => format!("Value::String(\"{}\".to_string())", escape(s)),
        serde_json::Value::Bool(b) => format!("Value::Bool({})", b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => format!("Value::Int({})", i),
            None => bail!("non-integer default {}", n),
        },
        other => bail!("unsupported default {}", other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(json: &str) -> ResourceDescription {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_file_and_output_arguments() {
        let args = Args::try_parse_from([
            "fmgr-codegen",
            "--file",
            "system_global.json",
            "--output",
            "fmgr-provider/src/schemas/generated/system_global.rs",
        ])
        .unwrap();
        assert_eq!(args.file.as_deref(), Some("system_global.json"));
        assert_eq!(
            args.output.as_deref(),
            Some("fmgr-provider/src/schemas/generated/system_global.rs")
        );

        assert!(Args::try_parse_from(["fmgr-codegen", "--input", "system_global.json"]).is_err());
    }

    #[test]
    fn derives_names_from_path() {
        assert_eq!(
            resource_name("obj/wireless-controller/wtp-profile/deny-mac-list"),
            "object_wirelesscontroller_wtpprofile_denymaclist"
        );
        assert_eq!(
            display_name("obj/wireless-controller/wtp-profile/deny-mac-list"),
            "ObjectWirelessControllerWtpProfileDenyMacList"
        );
        assert_eq!(resource_name("system/cluster-sync"), "system_clustersync");
        assert_eq!(display_name("system/cluster-sync"), "SystemClusterSync");
    }

    #[test]
    fn parent_keys_skip_scope_placeholders() {
        assert_eq!(
            parent_keys("/pm/config/{adom}/obj/wireless-controller/wtp-profile/{wtp-profile}/deny-mac-list"),
            vec!["wtp-profile".to_string()]
        );
        assert!(parent_keys("/pm/config/device/{device}/vdom/{vdom}/system/cluster-sync").is_empty());
    }

    #[test]
    fn table_resource_with_parent() {
        let code = generate_definition_code(&describe(
            r#"{
                "path": "obj/wireless-controller/wtp-profile/deny-mac-list",
                "url": "/pm/config/{adom}/obj/wireless-controller/wtp-profile/{wtp-profile}/deny-mac-list",
                "scope": "adom",
                "mkey": "id",
                "description": "List of MAC addresses that are denied access to this WTP, FortiAP, or AP.",
                "attributes": {
                    "id": { "type": "integer", "description": "ID." },
                    "mac": { "type": "mac", "computed": true }
                }
            }"#,
        ))
        .unwrap();

        assert!(code.starts_with(
            "//! object_wirelesscontroller_wtpprofile_denymaclist schema definition\n"
        ));
        assert!(code.contains("DO NOT EDIT MANUALLY - regenerate with fmgr-codegen"));
        assert!(code.contains(
            "use super::{ResourceDefinition, adom_attribute, dynamic_sort_subtable_attribute, scopetype_attribute};"
        ));
        assert!(code.contains("use fmgr_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};"));
        assert!(code.contains("pub fn object_wirelesscontroller_wtpprofile_denymaclist_definition() -> ResourceDefinition"));
        assert!(code.contains("display_name: \"ObjectWirelessControllerWtpProfileDenyMacList\""));
        assert!(code.contains(
            "Endpoint::table(\"/pm/config/{adom}/obj/wireless-controller/wtp-profile/{wtp-profile}/deny-mac-list\", \"id\")"
        ));
        assert!(code.contains("scope: Scope::Adom,"));
        assert!(code.contains("mkey: Some(\"id\"),"));
        assert!(code.contains("parents: &[(\"wtp_profile\", \"wtp-profile\")],"));
        assert!(code.contains("AttributeSchema::new(\"wtp_profile\", AttributeType::String)\n                .required()\n                .local_only()"));
        assert!(code.contains("AttributeSchema::new(\"id\", AttributeType::Int)\n                .required()"));
        assert!(code.contains("AttributeSchema::new(\"mac\", types::mac_address())\n                .optional()\n                .computed()"));
        assert!(code.ends_with("        ),\n    }\n}\n"));
    }

    #[test]
    fn singleton_with_defaults_and_enums() {
        let code = generate_definition_code(&describe(
            r#"{
                "path": "system/global",
                "url": "/pm/config/device/{device}/global/system/global",
                "scope": "device",
                "attributes": {
                    "language": { "type": "enum", "options": ["english", "french"], "default": "english" },
                    "strong-crypto": { "type": "enum", "options": ["enable", "disable"], "computed": true },
                    "admin-sport": { "type": "integer", "computed": true }
                }
            }"#,
        ))
        .unwrap();

        assert!(code.contains("Endpoint::singleton(\"/pm/config/device/{device}/global/system/global\")"));
        assert!(code.contains("mkey: None,"));
        assert!(code.contains("parents: &[],"));
        assert!(code.contains(".attribute(device_name_attribute())"));
        assert!(!code.contains("scopetype_attribute"));
        assert!(code.contains("use fmgr_core::resource::Value;"));
        assert!(code.contains("enum_type(&[\"english\", \"french\"])"));
        assert!(code.contains(".with_default(Value::String(\"english\".to_string()))"));
        assert!(code.contains("AttributeSchema::new(\"strong_crypto\", enable_disable())"));
        assert!(code.contains("AttributeSchema::new(\"admin_sport\", AttributeType::Int)"));
    }

    #[test]
    fn nested_table_and_set() {
        let code = generate_definition_code(&describe(
            r#"{
                "path": "obj/firewall/addrgrp",
                "url": "/pm/config/{adom}/obj/firewall/addrgrp",
                "scope": "adom",
                "mkey": "name",
                "attributes": {
                    "name": { "type": "string" },
                    "member": { "type": "set" },
                    "tagging": {
                        "type": "table",
                        "mkey": "name",
                        "attributes": {
                            "name": { "type": "string" },
                            "tags": { "type": "set" }
                        }
                    }
                }
            }"#,
        ))
        .unwrap();

        assert!(code.contains("use fmgr_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema};"));
        assert!(code.contains("string_set()"));
        assert!(code.contains("AttributeType::Table("));
        assert!(code.contains(".with_mkey(\"name\")"));
        assert!(code.contains("AttributeSchema::new(\"tags\", string_set())"));
    }

    #[test]
    fn api_keys_that_are_not_kebab_case_keep_their_name() {
        let code = generate_definition_code(&describe(
            r#"{
                "path": "obj/firewall/address",
                "url": "/pm/config/{adom}/obj/firewall/address",
                "scope": "adom",
                "mkey": "name",
                "attributes": {
                    "name": { "type": "string" },
                    "_image-base64": { "type": "string", "computed": true }
                }
            }"#,
        ))
        .unwrap();
        assert!(code.contains(".with_api_name(\"_image-base64\")"));
    }

    #[test]
    fn rejects_unknown_types_and_missing_mkey() {
        let err = generate_definition_code(&describe(
            r#"{
                "path": "system/global",
                "url": "/pm/config/device/{device}/global/system/global",
                "scope": "device",
                "attributes": { "hostname": { "type": "hostname" } }
            }"#,
        ))
        .unwrap_err();
        assert!(format!("{:#}", err).contains("unsupported attribute type 'hostname'"));

        let err = generate_definition_code(&describe(
            r#"{
                "path": "obj/firewall/address",
                "url": "/pm/config/{adom}/obj/firewall/address",
                "scope": "adom",
                "mkey": "name",
                "attributes": { "comment": { "type": "string" } }
            }"#,
        ))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "mkey 'name' is not an attribute of obj/firewall/address"
        );
    }
}
