//! Schema - Define type schemas for resources
//!
//! Each resource type declares its attributes here: the type, the
//! optional/required/computed/sensitive flags, defaults and nested blocks.
//! Flatten and expand are driven entirely by these descriptors.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::case::to_api_name;
use crate::resource::Value;

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Enum (list of allowed values)
    Enum(Vec<String>),
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    /// Ordered list
    List(Box<AttributeType>),
    /// Unordered collection without duplicates
    Set(Box<AttributeType>),
    /// Map
    Map(Box<AttributeType>),
    /// Single nested block, stored as a one-element list
    Block(BlockSchema),
    /// Repeated nested block (a table of rows)
    Table(BlockSchema),
}

impl AttributeType {
    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            // Integers may be written as numeric strings
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Int, Value::String(s)) if s.parse::<i64>().is_ok() => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::Enum(variants), Value::String(s)) => {
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(TypeError::InvalidEnumVariant {
                        value: s.clone(),
                        expected: variants.clone(),
                    })
                }
            }

            (AttributeType::Custom { validate, base, .. }, v) => {
                base.validate(v)?;
                validate(v).map_err(|msg| TypeError::ValidationFailed { message: msg })
            }

            (AttributeType::List(inner) | AttributeType::Set(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Block(block), Value::List(items)) => {
                if items.len() > 1 {
                    return Err(TypeError::TooManyItems {
                        max: 1,
                        got: items.len(),
                    });
                }
                for (i, item) in items.iter().enumerate() {
                    block.validate_row(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }
            (AttributeType::Block(block), Value::Map(_)) => block.validate_row(value),

            (AttributeType::Table(block), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    block.validate_row(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name(),
            }),
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Set(inner) => format!("Set<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
            AttributeType::Block(_) => "Block".to_string(),
            AttributeType::Table(_) => "Table".to_string(),
        }
    }

    /// Strip custom wrappers down to the underlying representation
    pub fn base(&self) -> &AttributeType {
        match self {
            AttributeType::Custom { base, .. } => base.base(),
            other => other,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Too many items: at most {max} allowed, got {got}")]
    TooManyItems { max: usize, got: usize },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },

    #[error("Attribute '{name}': {inner}")]
    AttributeError { name: String, inner: Box<TypeError> },
}

impl TypeError {
    pub fn in_attribute(self, name: impl Into<String>) -> Self {
        TypeError::AttributeError {
            name: name.into(),
            inner: Box::new(self),
        }
    }
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Never sent to or read from the API (routing and provider settings)
    pub local_only: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// API-side key when it is not the kebab-case form of `name`
    pub api_name: Option<String>,
    pub max_items: Option<usize>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        let max_items = match attr_type {
            AttributeType::Block(_) => Some(1),
            _ => None,
        };
        Self {
            name: name.into(),
            attr_type,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            local_only: false,
            default: None,
            description: None,
            api_name: None,
            max_items,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn local_only(mut self) -> Self {
        self.local_only = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_api_name(mut self, name: impl Into<String>) -> Self {
        self.api_name = Some(name.into());
        self
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Key of this attribute in the API object
    pub fn api_key(&self) -> String {
        self.api_name
            .clone()
            .unwrap_or_else(|| to_api_name(&self.name))
    }

    /// Computed attributes the user cannot set
    pub fn is_read_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    /// Whether expand sends this attribute to the API
    pub fn is_expanded(&self) -> bool {
        !self.local_only && !self.is_read_only()
    }

    /// Whether flatten reads this attribute back from the API
    pub fn is_flattened(&self) -> bool {
        !self.local_only && !self.sensitive
    }
}

/// Attribute set of a nested block
#[derive(Debug, Clone, Default)]
pub struct BlockSchema {
    pub attributes: BTreeMap<String, AttributeSchema>,
    /// Row key of a table, used for sorting subtables
    pub mkey: Option<String>,
}

impl BlockSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_mkey(mut self, mkey: impl Into<String>) -> Self {
        self.mkey = Some(mkey.into());
        self
    }

    fn validate_row(&self, row: &Value) -> Result<(), TypeError> {
        match row {
            Value::Map(map) => {
                let mut errors = Vec::new();
                validate_attributes(&self.attributes, map, &mut errors);
                match errors.into_iter().next() {
                    Some(e) => Err(e),
                    None => Ok(()),
                }
            }
            other => Err(TypeError::TypeMismatch {
                expected: "Map".to_string(),
                got: other.type_name(),
            }),
        }
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: BTreeMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: BTreeMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.get(name)
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();
        validate_attributes(&self.attributes, attributes, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fill unset attributes (including those of nested blocks) with their defaults
    pub fn apply_defaults(&self, attributes: &mut HashMap<String, Value>) {
        apply_defaults(&self.attributes, attributes);
    }
}

fn validate_attributes(
    schemas: &BTreeMap<String, AttributeSchema>,
    attributes: &HashMap<String, Value>,
    errors: &mut Vec<TypeError>,
) {
    // Check required attributes
    for (name, schema) in schemas {
        if schema.required && !attributes.contains_key(name) && schema.default.is_none() {
            errors.push(TypeError::MissingRequired { name: name.clone() });
        }
    }

    // Type check each attribute
    for (name, value) in attributes {
        let Some(schema) = schemas.get(name) else {
            // Unknown attributes are allowed (for flexibility)
            continue;
        };
        if let Some(max) = schema.max_items
            && let Value::List(items) = value
            && items.len() > max
        {
            errors.push(
                TypeError::TooManyItems {
                    max,
                    got: items.len(),
                }
                .in_attribute(name.clone()),
            );
            continue;
        }
        if let Err(e) = schema.attr_type.validate(value) {
            errors.push(e.in_attribute(name.clone()));
        }
    }
}

fn apply_defaults(
    schemas: &BTreeMap<String, AttributeSchema>,
    attributes: &mut HashMap<String, Value>,
) {
    for (name, schema) in schemas {
        if let Some(default) = &schema.default
            && !attributes.contains_key(name)
        {
            attributes.insert(name.clone(), default.clone());
        }

        let block = match &schema.attr_type {
            AttributeType::Block(block) | AttributeType::Table(block) => block,
            _ => continue,
        };
        if let Some(Value::List(rows)) = attributes.get_mut(name) {
            for row in rows.iter_mut() {
                if let Value::Map(map) = row {
                    apply_defaults(&block.attributes, map);
                }
            }
        }
    }
}

/// Helper functions for common types
pub mod types {
    use super::*;

    /// IPv4 address (e.g., "10.0.0.1")
    pub fn ipv4() -> AttributeType {
        AttributeType::Custom {
            name: "Ipv4".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| match value {
                Value::String(s) => validate_ipv4(s),
                _ => Err("Expected string".to_string()),
            },
        }
    }

    /// IPv4 address with netmask (e.g., "10.0.0.0 255.255.255.0" or "10.0.0.0/24")
    pub fn ipv4_netmask() -> AttributeType {
        AttributeType::Custom {
            name: "Ipv4Netmask".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| match value {
                Value::String(s) => validate_ipv4_netmask(s),
                _ => Err("Expected string".to_string()),
            },
        }
    }

    /// MAC address (e.g., "00:09:0f:aa:bb:cc")
    pub fn mac_address() -> AttributeType {
        AttributeType::Custom {
            name: "MacAddress".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| match value {
                Value::String(s) => validate_mac_address(s),
                _ => Err("Expected string".to_string()),
            },
        }
    }

    /// Port range (e.g., "443" or "1000-2000")
    pub fn port_range() -> AttributeType {
        AttributeType::Custom {
            name: "PortRange".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| match value {
                Value::String(s) => validate_port_range(s),
                _ => Err("Expected string".to_string()),
            },
        }
    }
}

/// Validate IPv4 address format (e.g., "10.0.0.1")
pub fn validate_ipv4(ip: &str) -> Result<(), String> {
    let octets: Vec<&str> = ip.split('.').collect();
    if octets.len() != 4 {
        return Err(format!("Invalid IP address '{}': expected 4 octets", ip));
    }

    for octet in &octets {
        if octet.parse::<u8>().is_err() {
            return Err(format!(
                "Invalid octet '{}' in IP address: must be 0-255",
                octet
            ));
        }
    }
    Ok(())
}

/// Validate "ip mask" or "ip/prefix" format
pub fn validate_ipv4_netmask(s: &str) -> Result<(), String> {
    if let Some((ip, prefix)) = s.split_once('/') {
        validate_ipv4(ip)?;
        return match prefix.parse::<u8>() {
            Ok(p) if p <= 32 => Ok(()),
            Ok(p) => Err(format!("Invalid prefix length '{}': must be 0-32", p)),
            Err(_) => Err(format!(
                "Invalid prefix length '{}': must be a number",
                prefix
            )),
        };
    }

    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid subnet '{}': expected IP/prefix or IP MASK",
            s
        ));
    }
    validate_ipv4(parts[0])?;
    validate_ipv4(parts[1])?;

    let mask: u32 = parts[1]
        .split('.')
        .filter_map(|o| o.parse::<u8>().ok())
        .fold(0, |acc, o| (acc << 8) | o as u32);
    if mask.leading_ones() + mask.trailing_zeros() != 32 {
        return Err(format!("Invalid netmask '{}': not contiguous", parts[1]));
    }
    Ok(())
}

/// Validate a colon separated MAC address
pub fn validate_mac_address(mac: &str) -> Result<(), String> {
    let groups: Vec<&str> = mac.split(':').collect();
    if groups.len() != 6
        || groups
            .iter()
            .any(|g| g.len() != 2 || u8::from_str_radix(g, 16).is_err())
    {
        return Err(format!(
            "Invalid MAC address '{}': expected xx:xx:xx:xx:xx:xx",
            mac
        ));
    }
    Ok(())
}

/// Validate a port or a "low-high" port range, optionally followed by ":src"
pub fn validate_port_range(range: &str) -> Result<(), String> {
    for part in range.split(':') {
        let (low, high) = part.split_once('-').unwrap_or((part, part));
        match (low.parse::<u16>(), high.parse::<u16>()) {
            (Ok(l), Ok(h)) if l <= h => {}
            _ => return Err(format!("Invalid port range '{}'", range)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_string_type() {
        let t = AttributeType::String;
        assert!(t.validate(&Value::String("hello".to_string())).is_ok());
        assert!(t.validate(&Value::Int(42)).is_err());
    }

    #[test]
    fn validate_int_accepts_numeric_strings() {
        let t = AttributeType::Int;
        assert!(t.validate(&Value::Int(5)).is_ok());
        assert!(t.validate(&Value::String("5".to_string())).is_ok());
        assert!(t.validate(&Value::String("five".to_string())).is_err());
    }

    #[test]
    fn validate_enum_type() {
        let t = AttributeType::Enum(vec!["enable".to_string(), "disable".to_string()]);
        assert!(t.validate(&Value::String("enable".to_string())).is_ok());
        assert!(t.validate(&Value::String("on".to_string())).is_err());
    }

    #[test]
    fn validate_block_max_items() {
        let block = BlockSchema::new()
            .attribute(AttributeSchema::new("mode", AttributeType::String).optional());
        let t = AttributeType::Block(block);

        let row = Value::Map(HashMap::from([(
            "mode".to_string(),
            Value::String("ap".to_string()),
        )]));
        assert!(t.validate(&Value::List(vec![row.clone()])).is_ok());
        assert!(matches!(
            t.validate(&Value::List(vec![row.clone(), row])),
            Err(TypeError::TooManyItems { max: 1, got: 2 })
        ));
    }

    #[test]
    fn validate_table_rows() {
        let block = BlockSchema::new()
            .attribute(AttributeSchema::new("id", AttributeType::Int).optional())
            .attribute(AttributeSchema::new("mac", types::mac_address()).optional());
        let t = AttributeType::Table(block);

        let good = Value::Map(HashMap::from([
            ("id".to_string(), Value::Int(1)),
            ("mac".to_string(), Value::String("00:09:0f:aa:bb:cc".to_string())),
        ]));
        let bad = Value::Map(HashMap::from([(
            "mac".to_string(),
            Value::String("not-a-mac".to_string()),
        )]));

        assert!(t.validate(&Value::List(vec![good.clone()])).is_ok());
        assert!(t.validate(&Value::List(vec![good, bad])).is_err());
    }

    #[test]
    fn validate_resource_schema() {
        let schema = ResourceSchema::new("object_firewall_address")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("color", AttributeType::Int).optional())
            .attribute(AttributeSchema::new("visibility", AttributeType::Bool).optional());

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("lan".to_string()));
        attrs.insert("color".to_string(), Value::Int(5));
        attrs.insert("visibility".to_string(), Value::Bool(true));

        assert!(schema.validate(&attrs).is_ok());
    }

    #[test]
    fn missing_required_attribute() {
        let schema = ResourceSchema::new("object_firewall_address")
            .attribute(AttributeSchema::new("name", AttributeType::String).required());

        let attrs = HashMap::new();
        let result = schema.validate(&attrs);
        assert!(matches!(
            result.unwrap_err().as_slice(),
            [TypeError::MissingRequired { .. }]
        ));
    }

    #[test]
    fn apply_defaults_fills_nested_blocks() {
        let lan = BlockSchema::new().attribute(
            AttributeSchema::new("port_mode", AttributeType::String)
                .optional()
                .with_default(Value::String("offline".to_string())),
        );
        let schema = ResourceSchema::new("wtp_profile")
            .attribute(
                AttributeSchema::new("ap_country", AttributeType::String)
                    .optional()
                    .with_default(Value::String("US".to_string())),
            )
            .attribute(AttributeSchema::new("lan", AttributeType::Block(lan)).optional());

        let mut attrs = HashMap::new();
        attrs.insert(
            "lan".to_string(),
            Value::List(vec![Value::Map(HashMap::new())]),
        );
        schema.apply_defaults(&mut attrs);

        assert_eq!(
            attrs.get("ap_country"),
            Some(&Value::String("US".to_string()))
        );
        let Some(Value::List(rows)) = attrs.get("lan") else {
            panic!("Expected lan block");
        };
        let Value::Map(lan) = &rows[0] else {
            panic!("Expected map");
        };
        assert_eq!(
            lan.get("port_mode"),
            Some(&Value::String("offline".to_string()))
        );
    }

    #[test]
    fn attribute_flags() {
        let read_only = AttributeSchema::new("uuid", AttributeType::String).computed();
        assert!(read_only.is_read_only());
        assert!(!read_only.is_expanded());
        assert!(read_only.is_flattened());

        let secret = AttributeSchema::new("login_passwd", AttributeType::String)
            .optional()
            .sensitive();
        assert!(secret.is_expanded());
        assert!(!secret.is_flattened());

        let meta = AttributeSchema::new("scopetype", AttributeType::String)
            .optional()
            .local_only();
        assert!(!meta.is_expanded());
        assert!(!meta.is_flattened());

        assert_eq!(
            AttributeSchema::new("deny_mac_list", AttributeType::String).api_key(),
            "deny-mac-list"
        );
        assert_eq!(
            AttributeSchema::new("fosid", AttributeType::Int)
                .with_api_name("id")
                .api_key(),
            "id"
        );
    }

    #[test]
    fn validate_netmask_formats() {
        assert!(validate_ipv4_netmask("10.0.0.0 255.255.255.0").is_ok());
        assert!(validate_ipv4_netmask("10.0.0.0/24").is_ok());
        assert!(validate_ipv4_netmask("10.0.0.0 255.0.255.0").is_err());
        assert!(validate_ipv4_netmask("10.0.0.0/33").is_err());
        assert!(validate_ipv4_netmask("10.0.0.0").is_err());
    }

    #[test]
    fn validate_mac_and_ports() {
        assert!(validate_mac_address("00:09:0f:aa:bb:cc").is_ok());
        assert!(validate_mac_address("00:09:0f:aa:bb").is_err());
        assert!(validate_port_range("443").is_ok());
        assert!(validate_port_range("1000-2000").is_ok());
        assert!(validate_port_range("2000-1000").is_err());
        assert!(validate_port_range("http").is_err());
    }
}
