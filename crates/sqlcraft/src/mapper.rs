//! Shaping of executed result rows.
//!
//! Every mapping here is pure: rows in, shaped value out. Grouping and
//! deduplication preserve first-occurrence order; plain keyed maps let a
//! later duplicate key overwrite an earlier one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::row::Row;

/// How a row yields its map key.
#[derive(Clone)]
pub enum KeyOf {
    /// The stringified value of one column.
    Column(String),
    /// Several column values joined with `_`.
    Columns(Vec<String>),
    /// Computed from the row, its index, and the full row set.
    Func(Arc<dyn Fn(&Row, usize, &[Row]) -> String + Send + Sync>),
}

impl fmt::Debug for KeyOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOf::Column(c) => f.debug_tuple("Column").field(c).finish(),
            KeyOf::Columns(cs) => f.debug_tuple("Columns").field(cs).finish(),
            KeyOf::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl KeyOf {
    pub fn column(name: impl Into<String>) -> Self {
        KeyOf::Column(name.into())
    }

    pub fn columns(names: &[&str]) -> Self {
        KeyOf::Columns(names.iter().map(|n| n.to_string()).collect())
    }

    fn key(&self, row: &Row, index: usize, all: &[Row]) -> String {
        match self {
            KeyOf::Column(c) => key_string(row.get(c.as_str())),
            KeyOf::Columns(cs) => cs
                .iter()
                .map(|c| key_string(row.get(c.as_str())))
                .collect::<Vec<_>>()
                .join("_"),
            KeyOf::Func(f) => f(row, index, all),
        }
    }
}

/// Stringify a column value for use as a map key. Strings keep their
/// content unquoted; everything else renders as JSON.
fn key_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// How a row projects into a shaped value.
#[derive(Clone)]
pub enum RowShape {
    /// The value of one column.
    Field(String),
    /// Computed from the row, its index, and the full row set.
    Func(Arc<dyn Fn(&Row, usize, &[Row]) -> Value + Send + Sync>),
    /// An array of nested shapes.
    List(Vec<RowShape>),
    /// An object of named nested shapes.
    Object(Vec<(String, RowShape)>),
}

impl fmt::Debug for RowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowShape::Field(c) => f.debug_tuple("Field").field(c).finish(),
            RowShape::Func(_) => f.write_str("Func(..)"),
            RowShape::List(items) => f.debug_tuple("List").field(items).finish(),
            RowShape::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
        }
    }
}

impl RowShape {
    pub fn field(name: impl Into<String>) -> Self {
        RowShape::Field(name.into())
    }

    fn project(&self, row: &Row, index: usize, all: &[Row]) -> Value {
        match self {
            RowShape::Field(c) => row.get(c.as_str()).cloned().unwrap_or(Value::Null),
            RowShape::Func(f) => f(row, index, all),
            RowShape::List(items) => Value::Array(
                items.iter().map(|s| s.project(row, index, all)).collect(),
            ),
            RowShape::Object(fields) => {
                let mut out = Map::new();
                for (name, shape) in fields {
                    out.insert(name.clone(), shape.project(row, index, all));
                }
                Value::Object(out)
            }
        }
    }
}

fn shaped(shape: Option<&RowShape>, row: &Row, index: usize, all: &[Row]) -> Value {
    match shape {
        Some(s) => s.project(row, index, all),
        None => Value::Object(row.clone()),
    }
}

/// The rows unchanged.
pub fn to_array(rows: &[Row], shape: Option<&RowShape>) -> Vec<Value> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| shaped(shape, row, i, rows))
        .collect()
}

/// The first row, shaped, or `None` for an empty result.
pub fn to_row(rows: &[Row], shape: Option<&RowShape>) -> Option<Value> {
    rows.first().map(|row| shaped(shape, row, 0, rows))
}

/// A keyed object: one shaped value per key, later keys overwrite.
pub fn to_object(rows: &[Row], key: &KeyOf, shape: Option<&RowShape>) -> Map<String, Value> {
    let mut out = Map::new();
    for (i, row) in rows.iter().enumerate() {
        out.insert(key.key(row, i, rows), shaped(shape, row, i, rows));
    }
    out
}

/// A grouped map: every row lands in its key's bucket, in row order.
pub fn to_map_array(
    rows: &[Row],
    key: &KeyOf,
    shape: Option<&RowShape>,
) -> HashMap<String, Vec<Value>> {
    let mut out: HashMap<String, Vec<Value>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        out.entry(key.key(row, i, rows))
            .or_default()
            .push(shaped(shape, row, i, rows));
    }
    out
}

/// Distinct shaped values, first occurrence kept, order preserved.
pub fn to_set(rows: &[Row], shape: Option<&RowShape>) -> Vec<Value> {
    let mut out = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let v = shaped(shape, row, i, rows);
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rows() -> Vec<Row> {
        let data = json!([
            {"age": 36, "name": "Mary"},
            {"age": 19, "name": "John"},
            {"age": 36, "name": "Andrew"},
        ]);
        match data {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::Object(m) => m,
                    _ => unreachable!(),
                })
                .collect(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn to_row_takes_the_first() {
        let rows = rows();
        let first = to_row(&rows, Some(&RowShape::field("name"))).unwrap();
        assert_eq!(first, json!("Mary"));
        assert!(to_row(&[], None).is_none());
    }

    #[test]
    fn to_object_overwrites_duplicate_keys() {
        let rows = rows();
        let by_age = to_object(&rows, &KeyOf::column("age"), Some(&RowShape::field("name")));
        assert_eq!(by_age.get("36"), Some(&json!("Andrew")));
        assert_eq!(by_age.get("19"), Some(&json!("John")));
    }

    #[test]
    fn to_map_array_groups_in_row_order() {
        let rows = rows();
        let grouped = to_map_array(&rows, &KeyOf::column("age"), Some(&RowShape::field("name")));
        assert_eq!(grouped["36"], vec![json!("Mary"), json!("Andrew")]);
        assert_eq!(grouped["19"], vec![json!("John")]);
    }

    #[test]
    fn composite_keys_join_with_underscore() {
        let rows = rows();
        let keyed = to_object(&rows, &KeyOf::columns(&["age", "name"]), None);
        assert!(keyed.contains_key("36_Mary"));
        assert!(keyed.contains_key("19_John"));
    }

    #[test]
    fn missing_key_column_stringifies_as_null() {
        let rows = rows();
        let keyed = to_object(&rows, &KeyOf::column("absent"), None);
        assert_eq!(keyed.len(), 1);
        assert!(keyed.contains_key("null"));
    }

    #[test]
    fn to_set_keeps_first_occurrence_order() {
        let rows = rows();
        let ages = to_set(&rows, Some(&RowShape::field("age")));
        assert_eq!(ages, vec![json!(36), json!(19)]);
    }

    #[test]
    fn shapes_compose_objects_and_lists() {
        let rows = rows();
        let shape = RowShape::Object(vec![
            ("who".to_string(), RowShape::field("name")),
            (
                "pair".to_string(),
                RowShape::List(vec![RowShape::field("age"), RowShape::field("name")]),
            ),
        ]);
        let first = to_row(&rows, Some(&shape)).unwrap();
        assert_eq!(first, json!({"who": "Mary", "pair": [36, "Mary"]}));
    }

    #[test]
    fn key_func_sees_index_and_row_set() {
        let rows = rows();
        let key = KeyOf::Func(Arc::new(|_, i, all| format!("{i}/{}", all.len())));
        let keyed = to_object(&rows, &key, None);
        assert!(keyed.contains_key("0/3"));
        assert!(keyed.contains_key("2/3"));
    }
}
