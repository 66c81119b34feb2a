//! Serialization boundary: absent-value pruning and JSON/YAML rendering
//!
//! Records serialize through serde into a `serde_json::Value` tree; nulls are pruned
//! only here, never while records are built. Exact decimals go through
//! `rust_decimal`'s serializer and come out as strings that keep their scale
//! (`"29.970"`), so no precision is lost on the way out.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::MediaMetaResult;

/// Recursively remove every null from mappings, including mappings nested in sequences.
pub fn strip_absent(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_absent(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_absent).collect()),
        other => other,
    }
}

/// Serialize a record and prune absent values
pub fn as_dict<T: Serialize>(record: &T) -> MediaMetaResult<Value> {
    Ok(strip_absent(serde_json::to_value(record)?))
}

/// Indented JSON of the pruned record, keys in declared field order
pub fn as_json<T: Serialize>(record: &T) -> MediaMetaResult<String> {
    Ok(serde_json::to_string_pretty(&as_dict(record)?)?)
}

/// YAML rendering of the pruned record
pub fn as_yaml<T: Serialize>(record: &T) -> MediaMetaResult<String> {
    Ok(serde_yaml::to_string(&as_dict(record)?)?)
}
