//! Convert - Flatten API objects into resource attributes and expand them back
//!
//! Expand turns resource attributes (snake_case, nested blocks as one-element
//! lists, sets) into the nested JSON object the API expects (kebab-case,
//! nested objects, plain lists). Flatten is the inverse. Both walk the
//! attribute schema, so only attributes declared there are converted.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde_json::Value as JsonValue;

use crate::resource::{Value, compare_values};
use crate::schema::{AttributeSchema, AttributeType, BlockSchema, TypeError};

/// JSON object as exchanged with the API
pub type ApiObject = serde_json::Map<String, JsonValue>;

/// Options affecting how API objects are flattened
#[derive(Debug, Clone, Copy, Default)]
pub struct FlattenOptions {
    /// Sort table rows by their row key
    pub sort_subtables: bool,
}

// =============================================================================
// Expand
// =============================================================================

/// Expand resource attributes into an API object
///
/// An attribute is sent when it is present in `current`. An attribute that
/// was present in `prior` but has since been removed is sent as the zero
/// value of its type so that the device clears it.
pub fn expand(
    schemas: &BTreeMap<String, AttributeSchema>,
    current: &HashMap<String, Value>,
    prior: &HashMap<String, Value>,
) -> Result<ApiObject, TypeError> {
    let mut obj = ApiObject::new();

    for (name, schema) in schemas {
        if !schema.is_expanded() {
            continue;
        }
        match current.get(name) {
            Some(value) => {
                let json = expand_value(&schema.attr_type, value)
                    .map_err(|e| e.in_attribute(name.clone()))?;
                obj.insert(schema.api_key(), json);
            }
            None if prior.contains_key(name) => {
                obj.insert(schema.api_key(), zero_value(&schema.attr_type));
            }
            None => {}
        }
    }

    Ok(obj)
}

/// Expand a single attribute value
pub fn expand_value(attr_type: &AttributeType, value: &Value) -> Result<JsonValue, TypeError> {
    match (attr_type, value) {
        (AttributeType::Custom { base, .. }, v) => expand_value(base, v),

        (AttributeType::String | AttributeType::Enum(_), Value::String(s)) => {
            Ok(JsonValue::String(s.clone()))
        }
        (AttributeType::Int, Value::Int(i)) => Ok(JsonValue::from(*i)),
        (AttributeType::Int, Value::String(s)) => s
            .parse::<i64>()
            .map(JsonValue::from)
            .map_err(|_| mismatch(attr_type, value)),
        (AttributeType::Bool, Value::Bool(b)) => Ok(JsonValue::Bool(*b)),

        (AttributeType::List(inner), Value::List(items)) => expand_items(inner, items),
        (AttributeType::Set(inner), Value::List(items)) => {
            let mut items = items.clone();
            items.sort_by(compare_values);
            items.dedup();
            expand_items(inner, &items)
        }
        // A lone scalar given for a list is sent as a one-element list
        (
            AttributeType::List(inner) | AttributeType::Set(inner),
            Value::String(_) | Value::Int(_) | Value::Bool(_),
        ) => Ok(JsonValue::Array(vec![expand_value(inner, value)?])),

        (AttributeType::Map(inner), Value::Map(map)) => {
            let mut obj = ApiObject::new();
            for (k, v) in map {
                obj.insert(k.clone(), expand_value(inner, v)?);
            }
            Ok(JsonValue::Object(obj))
        }

        (AttributeType::Block(block), Value::List(items)) => match items.first() {
            Some(row) => expand_row(block, row),
            None => Ok(JsonValue::Object(ApiObject::new())),
        },
        (AttributeType::Block(block), Value::Map(_)) => expand_row(block, value),

        (AttributeType::Table(block), Value::List(rows)) => rows
            .iter()
            .map(|row| expand_row(block, row))
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),

        _ => Err(mismatch(attr_type, value)),
    }
}

fn expand_items(inner: &AttributeType, items: &[Value]) -> Result<JsonValue, TypeError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            expand_value(inner, item).map_err(|e| TypeError::ListItemError {
                index,
                inner: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(JsonValue::Array)
}

fn expand_row(block: &BlockSchema, row: &Value) -> Result<JsonValue, TypeError> {
    match row {
        // Nested rows carry no prior state; only the keys present are sent
        Value::Map(map) => expand(&block.attributes, map, &HashMap::new()).map(JsonValue::Object),
        other => Err(TypeError::TypeMismatch {
            expected: "Map".to_string(),
            got: other.type_name(),
        }),
    }
}

/// Zero value sent for an attribute removed from the configuration
pub fn zero_value(attr_type: &AttributeType) -> JsonValue {
    match attr_type {
        AttributeType::String | AttributeType::Enum(_) => JsonValue::String(String::new()),
        AttributeType::Int => JsonValue::from(0),
        AttributeType::Bool => JsonValue::Bool(false),
        AttributeType::Custom { base, .. } => zero_value(base),
        AttributeType::List(_) | AttributeType::Set(_) | AttributeType::Table(_) => {
            JsonValue::Array(Vec::new())
        }
        AttributeType::Map(_) | AttributeType::Block(_) => JsonValue::Object(ApiObject::new()),
    }
}

fn mismatch(attr_type: &AttributeType, value: &Value) -> TypeError {
    TypeError::TypeMismatch {
        expected: attr_type.type_name(),
        got: value.type_name(),
    }
}

// =============================================================================
// Flatten
// =============================================================================

/// Flatten an API object into `target`
///
/// Only keys present in the API object are written; attributes whose key is
/// absent keep their current value, and API keys unknown to the schema are
/// ignored. Sensitive attributes are never read back.
pub fn flatten(
    schemas: &BTreeMap<String, AttributeSchema>,
    obj: &ApiObject,
    target: &mut HashMap<String, Value>,
    options: FlattenOptions,
) -> Result<(), TypeError> {
    for (name, schema) in schemas {
        if !schema.is_flattened() {
            continue;
        }
        let Some(raw) = obj.get(&schema.api_key()) else {
            continue;
        };
        if let Some(value) = flatten_value(&schema.attr_type, raw, options)
            .map_err(|e| e.in_attribute(name.clone()))?
        {
            target.insert(name.clone(), value);
        }
    }
    Ok(())
}

/// Flatten a single API value; `None` means "leave the attribute untouched"
pub fn flatten_value(
    attr_type: &AttributeType,
    raw: &JsonValue,
    options: FlattenOptions,
) -> Result<Option<Value>, TypeError> {
    let value = match (attr_type, raw) {
        (_, JsonValue::Null) => return Ok(None),
        (AttributeType::Custom { base, .. }, raw) => return flatten_value(base, raw, options),

        // Scalars are sometimes returned wrapped in a list
        (
            AttributeType::String | AttributeType::Enum(_) | AttributeType::Int | AttributeType::Bool,
            JsonValue::Array(items),
        ) => {
            return match items.as_slice() {
                [] => Ok(None),
                [single] => flatten_value(attr_type, single, options),
                _ => Err(mismatch_json(attr_type, raw)),
            };
        }

        (AttributeType::String | AttributeType::Enum(_), JsonValue::String(s)) => {
            Value::String(s.clone())
        }
        (AttributeType::String | AttributeType::Enum(_), JsonValue::Number(n)) => {
            Value::String(n.to_string())
        }
        (AttributeType::String | AttributeType::Enum(_), JsonValue::Bool(b)) => {
            Value::String(b.to_string())
        }

        (AttributeType::Int, JsonValue::Number(n)) => {
            match n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)) {
                Some(i) => Value::Int(i),
                None => return Err(mismatch_json(attr_type, raw)),
            }
        }
        (AttributeType::Int, JsonValue::String(s)) => match s.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => return Err(mismatch_json(attr_type, raw)),
        },

        (AttributeType::Bool, JsonValue::Bool(b)) => Value::Bool(*b),
        (AttributeType::Bool, JsonValue::String(s)) => match s.as_str() {
            "true" | "enable" => Value::Bool(true),
            "false" | "disable" => Value::Bool(false),
            _ => return Err(mismatch_json(attr_type, raw)),
        },

        (AttributeType::List(inner) | AttributeType::Set(inner), JsonValue::Array(items)) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                if let Some(v) = flatten_value(inner, item, options)? {
                    values.push(v);
                }
            }
            if matches!(attr_type, AttributeType::Set(_)) {
                values.sort_by(compare_values);
                values.dedup();
            }
            Value::List(values)
        }
        // A lone scalar returned for a list becomes a one-element list
        (
            AttributeType::List(inner) | AttributeType::Set(inner),
            JsonValue::String(_) | JsonValue::Number(_) | JsonValue::Bool(_),
        ) => match flatten_value(inner, raw, options)? {
            Some(v) => Value::List(vec![v]),
            None => return Ok(None),
        },

        (AttributeType::Map(inner), JsonValue::Object(map)) => {
            let mut values = HashMap::new();
            for (k, v) in map {
                if let Some(v) = flatten_value(inner, v, options)? {
                    values.insert(k.clone(), v);
                }
            }
            Value::Map(values)
        }

        (AttributeType::Block(block), JsonValue::Object(map)) => {
            block_value(flatten_row(block, map, options)?)
        }
        (AttributeType::Block(block), JsonValue::Array(items)) => match items.first() {
            Some(JsonValue::Object(map)) => block_value(flatten_row(block, map, options)?),
            None => Value::List(Vec::new()),
            Some(_) => return Err(mismatch_json(attr_type, raw)),
        },

        (AttributeType::Table(block), JsonValue::Array(items)) => {
            let mut rows = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    JsonValue::Object(map) => rows.push(Value::Map(flatten_row(block, map, options)?)),
                    _ => return Err(mismatch_json(attr_type, item)),
                }
            }
            if options.sort_subtables
                && let Some(mkey) = &block.mkey
            {
                rows.sort_by(|a, b| compare_rows(a, b, mkey));
            }
            Value::List(rows)
        }
        (AttributeType::Table(block), JsonValue::Object(map)) => {
            Value::List(vec![Value::Map(flatten_row(block, map, options)?)])
        }

        _ => return Err(mismatch_json(attr_type, raw)),
    };

    Ok(Some(value))
}

fn flatten_row(
    block: &BlockSchema,
    map: &ApiObject,
    options: FlattenOptions,
) -> Result<HashMap<String, Value>, TypeError> {
    let mut row = HashMap::new();
    flatten(&block.attributes, map, &mut row, options)?;
    Ok(row)
}

/// A cleared block comes back as `{}` and reads as no block at all
fn block_value(row: HashMap<String, Value>) -> Value {
    if row.is_empty() {
        Value::List(Vec::new())
    } else {
        Value::List(vec![Value::Map(row)])
    }
}

fn compare_rows(a: &Value, b: &Value, mkey: &str) -> Ordering {
    let key = |row: &Value| match row {
        Value::Map(map) => map.get(mkey).cloned(),
        _ => None,
    };
    match (key(a), key(b)) {
        (Some(x), Some(y)) => compare_values(&x, &y),
        (x, y) => x.is_some().cmp(&y.is_some()),
    }
}

fn mismatch_json(attr_type: &AttributeType, raw: &JsonValue) -> TypeError {
    let got = match raw {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    };
    TypeError::TypeMismatch {
        expected: attr_type.type_name(),
        got: got.to_string(),
    }
}

// =============================================================================
// Schema-less conversion
// =============================================================================

/// Convert a JSON value to a Value without schema guidance
pub fn json_to_value(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::String(s) => Some(Value::String(s.clone())),
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Int(i))
            } else {
                n.as_f64().map(|f| Value::Int(f as i64))
            }
        }
        JsonValue::Array(arr) => Some(Value::List(arr.iter().filter_map(json_to_value).collect())),
        JsonValue::Object(map) => Some(Value::Map(
            map.iter()
                .filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
        JsonValue::Null => None,
    }
}

/// Convert a Value to JSON without schema guidance
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::List(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}
