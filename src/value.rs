//! Shape classification of wire values.
//!
//! Values stay as `serde_json::Value` (insertion-ordered maps via
//! `preserve_order`); this is the one place that decides whether a value is
//! a scalar, a sequence, or a mapping.
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Strings (tagged or not), numbers, booleans and null.
    Scalar,
    Sequence,
    Mapping,
}

pub fn shape_of(value: &Value) -> Shape {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Shape::Scalar,
        Value::Array(_) => Shape::Sequence,
        Value::Object(_) => Shape::Mapping,
    }
}

pub fn is_sequence(value: &Value) -> bool {
    shape_of(value) == Shape::Sequence
}

pub fn is_mapping(value: &Value) -> bool {
    shape_of(value) == Shape::Mapping
}

/// Split a dotted path into its segments. `""` is a single empty segment.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.')
}

/// Expand dotted keys into nested mappings: `{"a.b": 1}` → `{"a": {"b": 1}}`.
/// Overlapping keys merge (`"a.b"` and `"a.c"` share one `a`).
pub fn expand_dotted(input: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in input {
        let mut path: Vec<&str> = segments(&key).collect();
        let leaf = path.pop().unwrap_or_default();
        let mut cursor = &mut out;
        for segment in path {
            let slot = cursor
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            cursor = coerce_mapping(slot);
        }
        match cursor.get_mut(leaf) {
            Some(existing) => merge_into(existing, value),
            None => {
                cursor.insert(leaf.to_string(), value);
            }
        }
    }
    out
}

/// Deep-merge `incoming` into `slot` where both are mappings; otherwise
/// `incoming` wins.
fn merge_into(slot: &mut Value, incoming: Value) {
    match (slot, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(inner) => merge_into(inner, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, incoming) => *slot = incoming,
    }
}

/// Borrow `slot` as a mapping, replacing any non-mapping with an empty one.
pub(crate) fn coerce_mapping(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced with a mapping"),
    }
}

// ------------------------------- Tests ------------------------------------ //
