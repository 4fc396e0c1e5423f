//! # Transport-Key Normalizer
//!
//! The response decoder leaves wire-typing data inside records (`$` attribute maps and
//! `type` keys). This module removes them at every depth, including inside arrays,
//! before a record is treated as document content.

use crate::constants::TRANSPORT_KEYS;
use serde_json::{Map, Value};

/// Returns `true` if `key` is one of the reserved transport keys.
pub fn is_transport_key(key: &str) -> bool {
    TRANSPORT_KEYS.contains(&key)
}

/// Returns a copy of `value` with every transport key removed at any depth.
///
/// Objects are rebuilt in their original key order, arrays element by element.
/// Primitives are cloned as-is. The input is never modified.
pub fn strip_transport_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !is_transport_key(key))
                .map(|(key, child)| (key.clone(), strip_transport_keys(child)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_transport_keys).collect()),
        primitive => primitive.clone(),
    }
}
