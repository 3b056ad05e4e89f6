//! Dotted-path access over a flat map of top-level attributes.
//!
//! Each top-level value sits behind an `Arc`. An update copies the outer map
//! (bumping refcounts only), clones the top-level values it touches, mutates
//! those copies, and swaps the whole map in. Untouched keys keep the very
//! same `Arc` they had before.
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::value::{coerce_mapping, expand_dotted, segments};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedStore {
    attrs: IndexMap<String, Arc<Value>>,
}

/// Top-level keys whose value differs after an update, in update order.
pub type Changes = Vec<String>;

impl NestedStore {
    pub fn new(initial: Map<String, Value>) -> Self {
        let attrs = expand_dotted(initial)
            .into_iter()
            .map(|(k, v)| (k, Arc::new(v)))
            .collect();
        Self { attrs }
    }

    /// Keys are kept exactly as received, dotted or not, so `to_json`
    /// reproduces `map`.
    pub fn from_wire(map: Map<String, Value>) -> Self {
        let attrs = map.into_iter().map(|(k, v)| (k, Arc::new(v))).collect();
        Self { attrs }
    }

    /// Anything but a mapping yields an empty store.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::new(map),
            Value::Null => Self::default(),
            other => {
                tracing::debug!(kind = ?crate::value::shape_of(&other), "store built from non-mapping; starting empty");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    /// The shared handle for a top-level key.
    pub fn root(&self, key: &str) -> Option<&Arc<Value>> {
        self.attrs.get(key)
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segs = segments(path);
        let root = segs.next()?;
        let mut value: &Value = self.attrs.get(root)?;
        for seg in segs {
            value = value.as_object()?.get(seg)?;
        }
        Some(value)
    }

    /// Present and not `null`.
    pub fn has(&self, path: &str) -> bool {
        !matches!(self.get(path), None | Some(Value::Null))
    }

    pub fn set(&mut self, path: &str, value: Value) -> Changes {
        self.set_many([(path, value)])
    }

    /// Apply several path assignments as one update. Paths sharing a root
    /// all land in the same cloned root, so `a.b` and `a.c` both survive.
    pub fn set_many<I, S>(&mut self, updates: I) -> Changes
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let mut working = self.attrs.clone();
        let mut touched: Vec<String> = Vec::new();
        for (path, value) in updates {
            let path = path.as_ref();
            let root = assign(&mut working, path, value);
            if !touched.iter().any(|k| k == root) {
                touched.push(root.to_string());
            }
        }
        self.commit(working, touched)
    }

    /// Remove the value at `path`. Returns whether anything was removed.
    pub fn unset(&mut self, path: &str) -> bool {
        let mut segs: Vec<&str> = segments(path).collect();
        let Some(leaf) = segs.pop() else { return false };
        if segs.is_empty() {
            return self.attrs.shift_remove(leaf).is_some();
        }
        if self.get(path).is_none() {
            return false;
        }
        let mut working = self.attrs.clone();
        let root = segs[0];
        let Some(slot) = working.get_mut(root) else { return false };
        let mut cursor: &mut Value = Arc::make_mut(slot);
        for seg in &segs[1..] {
            let Some(next) = cursor.as_object_mut().and_then(|m| m.get_mut(*seg)) else {
                return false;
            };
            cursor = next;
        }
        let removed = cursor
            .as_object_mut()
            .and_then(|m| m.shift_remove(leaf))
            .is_some();
        self.attrs = working;
        removed
    }

    /// Plain nested mapping of the current attributes.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .attrs
            .iter()
            .map(|(k, v)| (k.clone(), Value::clone(v)))
            .collect();
        Value::Object(map)
    }

    fn commit(&mut self, working: IndexMap<String, Arc<Value>>, touched: Vec<String>) -> Changes {
        let changes: Changes = touched
            .into_iter()
            .filter(|k| self.attrs.get(k) != working.get(k))
            .collect();
        if !changes.is_empty() {
            tracing::trace!(?changes, "store updated");
        }
        self.attrs = working;
        changes
    }
}

impl From<Map<String, Value>> for NestedStore {
    fn from(map: Map<String, Value>) -> Self {
        Self::new(map)
    }
}

/// Write `value` at `path` inside `working`, cloning the root on first touch.
/// Returns the root key.
fn assign<'p>(working: &mut IndexMap<String, Arc<Value>>, path: &'p str, value: Value) -> &'p str {
    let mut segs = segments(path);
    let root = segs.next().unwrap_or_default();
    let rest: Vec<&str> = segs.collect();
    let Some((leaf, middle)) = rest.split_last() else {
        working.insert(root.to_string(), Arc::new(value));
        return root;
    };
    let slot = working
        .entry(root.to_string())
        .or_insert_with(|| Arc::new(Value::Object(Map::new())));
    let mut cursor = descend(Arc::make_mut(slot), path, root);
    for seg in middle {
        let next = cursor
            .entry(seg.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        cursor = descend(next, path, seg);
    }
    cursor.insert(leaf.to_string(), value);
    root
}

fn descend<'v>(slot: &'v mut Value, path: &str, segment: &str) -> &'v mut Map<String, Value> {
    if !slot.is_object() {
        tracing::warn!(path, segment, "replacing non-mapping value to descend into it");
    }
    coerce_mapping(slot)
}

// ------------------------------- Tests ------------------------------------ //
