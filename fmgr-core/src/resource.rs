//! Resource - Representing resource values and resource data

use std::cmp::Ordering;
use std::collections::HashMap;

/// Attribute value of a resource
///
/// Nested blocks are stored as a `List` of `Map`; a single nested block is a
/// one-element list.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Returns true for the zero value of the variant ("", 0, false, empty collections)
    pub fn is_zero(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Int(i) => *i == 0,
            Value::Bool(b) => !b,
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Render a scalar as the string used for identifiers and routing keys
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) => 1,
            Value::String(_) => 2,
            Value::List(_) => 3,
            Value::Map(_) => 4,
        }
    }
}

/// Total order used for set members and table rows.
///
/// Integers (and strings holding integers) compare numerically, other
/// strings lexically.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => {
            match (x.parse::<i64>(), y.parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Int(x), Value::String(y)) => match y.parse::<i64>() {
            Ok(y) => x.cmp(&y),
            Err(_) => Ordering::Less,
        },
        (Value::String(x), Value::Int(y)) => match x.parse::<i64>() {
            Ok(x) => x.cmp(y),
            Err(_) => Ordering::Greater,
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::List(x), Value::List(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = compare_values(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Map(x), Value::Map(y)) => format!("{:?}", sorted_entries(x))
            .cmp(&format!("{:?}", sorted_entries(y))),
        _ => a.rank().cmp(&b.rank()),
    }
}

fn sorted_entries(map: &HashMap<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Resource data handed to and returned from the CRUD handlers
///
/// Holds the current (planned or refreshed) attributes, the prior state
/// attributes used for change detection, and the resource identifier. An
/// empty identifier means the resource does not exist.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceData {
    pub resource_type: String,
    id: String,
    attributes: HashMap<String, Value>,
    prior: HashMap<String, Value>,
}

impl ResourceData {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_attributes(mut self, attributes: HashMap<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attach the last known state, used by `has_change`
    pub fn with_prior(mut self, prior: HashMap<String, Value>) -> Self {
        self.prior = prior;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get an attribute only when it holds a non-zero value
    pub fn get_ok(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_zero())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// String form of a key attribute, used as the resource identifier
    pub fn get_string_key(&self, name: &str) -> Option<String> {
        self.get_ok(name).and_then(Value::to_key_string)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.attributes
    }

    pub fn prior(&self) -> &HashMap<String, Value> {
        &self.prior
    }

    /// Returns true when the attribute differs from the prior state
    pub fn has_change(&self, name: &str) -> bool {
        self.attributes.get(name) != self.prior.get(name)
    }

    /// Make the current attributes the prior state
    pub fn commit(&mut self) {
        self.prior = self.attributes.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_ok_skips_zero_values() {
        let data = ResourceData::new("object_firewall_address")
            .with_attribute("name", Value::String("lan".to_string()))
            .with_attribute("comment", Value::String(String::new()))
            .with_attribute("color", Value::Int(0));

        assert!(data.get_ok("name").is_some());
        assert!(data.get_ok("comment").is_none());
        assert!(data.get_ok("color").is_none());
        assert!(data.get("color").is_some());
    }

    #[test]
    fn string_key_renders_integers() {
        let data = ResourceData::new("object_wirelesscontroller_wtpprofile_denymaclist")
            .with_attribute("id", Value::Int(7));
        assert_eq!(data.get_string_key("id"), Some("7".to_string()));
        assert_eq!(data.get_string_key("missing"), None);
    }

    #[test]
    fn has_change_compares_with_prior() {
        let mut prior = HashMap::new();
        prior.insert("comment".to_string(), Value::String("old".to_string()));
        prior.insert("color".to_string(), Value::Int(3));

        let data = ResourceData::new("object_firewall_address")
            .with_attribute("comment", Value::String("new".to_string()))
            .with_attribute("color", Value::Int(3))
            .with_prior(prior);

        assert!(data.has_change("comment"));
        assert!(!data.has_change("color"));
        assert!(!data.has_change("never_set"));
    }

    #[test]
    fn clear_id_marks_resource_gone() {
        let mut data = ResourceData::new("system_global").with_id("SystemGlobal");
        assert!(data.has_id());
        data.clear_id();
        assert!(!data.has_id());
        assert_eq!(data.id(), "");
    }

    #[test]
    fn compare_values_orders_numeric_strings_numerically() {
        let a = Value::String("9".to_string());
        let b = Value::String("10".to_string());
        assert_eq!(compare_values(&a, &b), Ordering::Less);

        let c = Value::String("port10".to_string());
        let d = Value::String("port9".to_string());
        assert_eq!(compare_values(&c, &d), Ordering::Less);

        assert_eq!(
            compare_values(&Value::Int(2), &Value::String("10".to_string())),
            Ordering::Less
        );
    }
}
