//! Differ - Compare desired attributes with the current state
//!
//! Produces the change set shown by `plan` before anything is sent to the
//! device.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::resource::{Value, compare_values};
use crate::schema::{AttributeType, BlockSchema, ResourceSchema};

/// Result of a diff operation
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create,
    /// Resource exists with differences -> needs update
    Update { changed_attributes: Vec<String> },
    /// Resource exists with no differences -> no action needed
    NoChange,
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange)
    }
}

/// Compare desired attributes with the current state (`None` when the resource does not exist)
pub fn diff(
    schema: &ResourceSchema,
    desired: &HashMap<String, Value>,
    current: Option<&HashMap<String, Value>>,
) -> Diff {
    let Some(current) = current else {
        return Diff::Create;
    };

    // Read-back tables are sorted by row key when the resource asks for it
    let sort_subtables = desired
        .get("dynamic_sort_subtable")
        .and_then(Value::as_str)
        == Some("true");

    let mut changed: Vec<String> = schema
        .attributes
        .iter()
        .filter(|(_, attr)| !attr.is_read_only())
        .filter(|(name, attr)| {
            match (desired.get(name.as_str()), current.get(name.as_str())) {
                (Some(d), Some(c)) => !values_equal(&attr.attr_type, d, c, sort_subtables),
                (Some(d), None) => !is_unset(d),
                // Removing an attribute clears it on the device
                (None, Some(c)) => !is_unset(c) && !attr.computed,
                (None, None) => false,
            }
        })
        .map(|(name, _)| name.clone())
        .collect();
    changed.sort();

    if changed.is_empty() {
        Diff::NoChange
    } else {
        Diff::Update {
            changed_attributes: changed,
        }
    }
}

/// Zero value, or a block whose only row holds nothing but zero values
fn is_unset(value: &Value) -> bool {
    match value {
        Value::List(rows) if rows.len() == 1 => match &rows[0] {
            Value::Map(row) => row.values().all(is_unset),
            _ => false,
        },
        other => other.is_zero(),
    }
}

/// Compare two values the way the device stores them
///
/// Sets ignore member order, ints may be written as strings, and nested
/// blocks and tables are compared row by row against their own schema.
fn values_equal(attr_type: &AttributeType, a: &Value, b: &Value, sort_subtables: bool) -> bool {
    match (attr_type.base(), a, b) {
        (AttributeType::Set(inner), Value::List(x), Value::List(y)) => {
            let x = sorted_members(x);
            let y = sorted_members(y);
            lists_equal(inner, &x, &y, sort_subtables)
        }
        (AttributeType::List(inner), Value::List(x), Value::List(y)) => {
            lists_equal(inner, x, y, sort_subtables)
        }
        (AttributeType::Int, Value::Int(x), Value::String(y))
        | (AttributeType::Int, Value::String(y), Value::Int(x)) => {
            y.parse::<i64>().is_ok_and(|y| y == *x)
        }
        (AttributeType::Block(block), _, _) => {
            let (x, y) = (block_rows(a), block_rows(b));
            match (x.first(), y.first()) {
                (Some(x), Some(y)) => rows_equal(block, x, y, sort_subtables),
                (Some(row), None) | (None, Some(row)) => is_unset(&Value::List(vec![(*row).clone()])),
                (None, None) => true,
            }
        }
        (AttributeType::Table(block), Value::List(x), Value::List(y)) => {
            if x.len() != y.len() {
                return false;
            }
            let mut x: Vec<&Value> = x.iter().collect();
            let mut y: Vec<&Value> = y.iter().collect();
            if sort_subtables && let Some(mkey) = &block.mkey {
                x.sort_by(|l, r| compare_row_keys(l, r, mkey));
                y.sort_by(|l, r| compare_row_keys(l, r, mkey));
            }
            x.iter()
                .zip(y.iter())
                .all(|(l, r)| rows_equal(block, l, r, sort_subtables))
        }
        _ => a == b,
    }
}

fn sorted_members(items: &[Value]) -> Vec<Value> {
    let mut items = items.to_vec();
    items.sort_by(compare_values);
    items.dedup_by(|l, r| compare_values(l, r) == Ordering::Equal);
    items
}

fn lists_equal(inner: &AttributeType, x: &[Value], y: &[Value], sort_subtables: bool) -> bool {
    x.len() == y.len()
        && x
            .iter()
            .zip(y.iter())
            .all(|(l, r)| values_equal(inner, l, r, sort_subtables))
}

/// Rows of a block, which may be written as a map or a one-element list
fn block_rows(value: &Value) -> Vec<&Value> {
    match value {
        Value::List(rows) => rows.iter().collect(),
        other => vec![other],
    }
}

/// Compare two rows attribute by attribute
///
/// Row attributes left out of the desired row are not sent, so whatever the
/// device reports for them is not a difference.
fn rows_equal(block: &BlockSchema, desired: &Value, current: &Value, sort_subtables: bool) -> bool {
    let (Value::Map(desired), Value::Map(current)) = (desired, current) else {
        return desired == current;
    };
    desired.iter().all(|(name, d)| {
        let Some(attr) = block.attributes.get(name) else {
            return current.get(name).is_none_or(|c| c == d);
        };
        if attr.is_read_only() {
            return true;
        }
        match current.get(name) {
            Some(c) => values_equal(&attr.attr_type, d, c, sort_subtables),
            None => is_unset(d),
        }
    })
}

fn compare_row_keys(a: &Value, b: &Value, mkey: &str) -> Ordering {
    let key = |row: &Value| match row {
        Value::Map(map) => map.get(mkey).cloned(),
        _ => None,
    };
    match (key(a), key(b)) {
        (Some(x), Some(y)) => compare_values(&x, &y),
        (x, y) => x.is_some().cmp(&y.is_some()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeSchema;

    fn wtp_profile_schema() -> ResourceSchema {
        let radio = BlockSchema::new()
            .attribute(AttributeSchema::new("band", AttributeType::String).optional())
            .attribute(
                AttributeSchema::new("channel", AttributeType::Set(Box::new(AttributeType::String)))
                    .optional(),
            )
            .attribute(AttributeSchema::new("mode", AttributeType::String).optional().computed());
        let deny_mac_list = BlockSchema::new()
            .with_mkey("id")
            .attribute(AttributeSchema::new("id", AttributeType::Int).optional())
            .attribute(AttributeSchema::new("mac", AttributeType::String).optional());

        ResourceSchema::new("object_wirelesscontroller_wtpprofile")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("radio_1", AttributeType::Block(radio)).optional())
            .attribute(
                AttributeSchema::new("deny_mac_list", AttributeType::Table(deny_mac_list))
                    .optional(),
            )
            .attribute(
                AttributeSchema::new("dynamic_sort_subtable", AttributeType::String)
                    .optional()
                    .local_only(),
            )
    }

    fn row(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn schema() -> ResourceSchema {
        ResourceSchema::new("object_firewall_addrgrp")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("comment", AttributeType::String).optional())
            .attribute(AttributeSchema::new("color", AttributeType::Int).optional())
            .attribute(
                AttributeSchema::new("member", AttributeType::Set(Box::new(AttributeType::String)))
                    .optional(),
            )
            .attribute(AttributeSchema::new("uuid", AttributeType::String).computed())
    }

    fn string(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn diff_create_when_not_exists() {
        let desired = HashMap::from([("name".to_string(), string("servers"))]);
        assert_eq!(diff(&schema(), &desired, None), Diff::Create);
    }

    #[test]
    fn diff_no_change_when_same() {
        let desired = HashMap::from([
            ("name".to_string(), string("servers")),
            (
                "member".to_string(),
                Value::List(vec![string("web"), string("db")]),
            ),
        ]);
        let current = HashMap::from([
            ("name".to_string(), string("servers")),
            (
                "member".to_string(),
                Value::List(vec![string("db"), string("web")]),
            ),
            ("uuid".to_string(), string("2b6f")),
        ]);

        let result = diff(&schema(), &desired, Some(&current));
        assert_eq!(result, Diff::NoChange);
        assert!(!result.is_change());
    }

    #[test]
    fn diff_update_when_different() {
        let desired = HashMap::from([
            ("name".to_string(), string("servers")),
            ("color".to_string(), Value::Int(4)),
        ]);
        let current = HashMap::from([
            ("name".to_string(), string("servers")),
            ("color".to_string(), Value::Int(1)),
            ("comment".to_string(), string("legacy")),
        ]);

        match diff(&schema(), &desired, Some(&current)) {
            Diff::Update { changed_attributes } => {
                assert_eq!(changed_attributes, vec!["color", "comment"]);
            }
            other => panic!("Expected Update, got {:?}", other),
        }
    }

    #[test]
    fn nested_set_ignores_member_order() {
        let desired = HashMap::from([
            ("name".to_string(), string("ap")),
            (
                "radio_1".to_string(),
                Value::List(vec![row(&[
                    ("band", string("802.11ac")),
                    ("channel", Value::List(vec![string("149"), string("36")])),
                ])]),
            ),
        ]);
        let current = HashMap::from([
            ("name".to_string(), string("ap")),
            (
                "radio_1".to_string(),
                Value::List(vec![row(&[
                    ("band", string("802.11ac")),
                    ("channel", Value::List(vec![string("36"), string("149")])),
                    ("mode", string("ap")),
                ])]),
            ),
        ]);
        assert_eq!(diff(&wtp_profile_schema(), &desired, Some(&current)), Diff::NoChange);

        let mut moved = desired.clone();
        moved.insert(
            "radio_1".to_string(),
            Value::List(vec![row(&[
                ("band", string("802.11ac")),
                ("channel", Value::List(vec![string("40")])),
            ])]),
        );
        assert_eq!(
            diff(&wtp_profile_schema(), &moved, Some(&current)),
            Diff::Update {
                changed_attributes: vec!["radio_1".to_string()]
            }
        );
    }

    #[test]
    fn table_row_int_written_as_string() {
        let desired = HashMap::from([
            ("name".to_string(), string("ap")),
            (
                "deny_mac_list".to_string(),
                Value::List(vec![row(&[
                    ("id", string("3")),
                    ("mac", string("00:09:0f:aa:bb:cc")),
                ])]),
            ),
        ]);
        let current = HashMap::from([
            ("name".to_string(), string("ap")),
            (
                "deny_mac_list".to_string(),
                Value::List(vec![row(&[
                    ("id", Value::Int(3)),
                    ("mac", string("00:09:0f:aa:bb:cc")),
                ])]),
            ),
        ]);
        assert_eq!(diff(&wtp_profile_schema(), &desired, Some(&current)), Diff::NoChange);
    }

    #[test]
    fn table_rows_compared_by_key_when_sorted() {
        let rows = |ids: &[i64]| {
            Value::List(
                ids.iter()
                    .map(|id| row(&[("id", Value::Int(*id))]))
                    .collect(),
            )
        };
        let mut current = HashMap::from([
            ("name".to_string(), string("ap")),
            ("deny_mac_list".to_string(), rows(&[9, 10])),
        ]);
        let mut desired = HashMap::from([
            ("name".to_string(), string("ap")),
            ("deny_mac_list".to_string(), rows(&[10, 9])),
        ]);
        assert!(diff(&wtp_profile_schema(), &desired, Some(&current)).is_change());

        desired.insert("dynamic_sort_subtable".to_string(), string("true"));
        current.insert("dynamic_sort_subtable".to_string(), string("true"));
        assert_eq!(diff(&wtp_profile_schema(), &desired, Some(&current)), Diff::NoChange);
    }

    #[test]
    fn cleared_block_is_not_a_change() {
        let desired = HashMap::from([("name".to_string(), string("ap"))]);
        for cleared in [
            Value::List(Vec::new()),
            Value::List(vec![row(&[])]),
            Value::List(vec![row(&[("band", string(""))])]),
        ] {
            let current = HashMap::from([
                ("name".to_string(), string("ap")),
                ("radio_1".to_string(), cleared),
            ]);
            assert_eq!(diff(&wtp_profile_schema(), &desired, Some(&current)), Diff::NoChange);
        }
    }
}
