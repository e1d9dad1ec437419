use heck::ToLowerCamelCase;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{SqlError, SqlResult};

/// One result row: an ordered map of column name to value. Drivers must
/// normalize single-row and scalar result shapes to a row list before
/// handing results over.
pub type Row = Map<String, Value>;

/// Decode one row into `T` through its serde implementation.
pub fn decode_row<T: DeserializeOwned>(row: &Row) -> SqlResult<T> {
    serde_json::from_value(Value::Object(row.clone()))
        .map_err(|e| SqlError::execution(format!("row decode failed: {e}")))
}

/// Decode every row into `T`.
pub fn decode_rows<T: DeserializeOwned>(rows: &[Row]) -> SqlResult<Vec<T>> {
    rows.iter().map(decode_row).collect()
}

/// Convert a row's keys to lowerCamelCase. Applied to results when the
/// configuration enables case conversion; values are untouched.
pub fn camelize_keys(row: Row) -> Row {
    row.into_iter()
        .map(|(k, v)| (k.to_lower_camel_case(), v))
        .collect()
}
