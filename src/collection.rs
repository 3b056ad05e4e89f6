//! Record collections in either of the two wire shapes.
//!
//! - mapped: `{"name": {...}, "owner": {...}}`, ids are the keys
//! - indexed: `[{...}, {...}]`, ids are positions, assigned when normalized
//!
//! Ids live beside the record body, never inside it, so `denormalize`
//! reproduces the payload that `normalize` was given.
use std::fmt;

use serde_json::{Map, Value};

use crate::store::NestedStore;
use crate::value::shape_of;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionShape {
    Mapped,
    Indexed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Name(String),
    Index(usize),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Name(name) => f.write_str(name),
            RecordId::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(name: &str) -> Self {
        RecordId::Name(name.to_string())
    }
}

impl From<usize> for RecordId {
    fn from(i: usize) -> Self {
        RecordId::Index(i)
    }
}

/// What a record holds. Mappings are path-addressable; anything else the
/// server sends (`null`, a scalar, a sequence) is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    Attributes(NestedStore),
    Raw(Value),
}

impl RecordBody {
    fn from_wire(body: Value) -> Self {
        match body {
            Value::Object(map) => RecordBody::Attributes(NestedStore::from_wire(map)),
            other => {
                tracing::debug!(shape = ?shape_of(&other), "record body is not a mapping; keeping it raw");
                RecordBody::Raw(other)
            }
        }
    }

    fn to_json(&self) -> Value {
        match self {
            RecordBody::Attributes(store) => store.to_json(),
            RecordBody::Raw(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    body: RecordBody,
}

impl Record {
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn body(&self) -> &RecordBody {
        &self.body
    }

    /// `None` for raw bodies.
    pub fn attributes(&self) -> Option<&NestedStore> {
        match &self.body {
            RecordBody::Attributes(store) => Some(store),
            RecordBody::Raw(_) => None,
        }
    }

    /// Path access for editing. A raw body is replaced by an empty store,
    /// the same coercion `NestedStore::set` applies to scalars in the way.
    pub fn attributes_mut(&mut self) -> &mut NestedStore {
        if let RecordBody::Raw(value) = &self.body {
            tracing::warn!(id = %self.id, shape = ?shape_of(value), "replacing raw record body to edit it");
            self.body = RecordBody::Attributes(NestedStore::default());
        }
        match &mut self.body {
            RecordBody::Attributes(store) => store,
            RecordBody::Raw(_) => unreachable!("raw body was just replaced"),
        }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.attributes()?.get(path)
    }

    /// The body in wire form.
    pub fn to_json(&self) -> Value {
        self.body.to_json()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    shape: CollectionShape,
    records: Vec<Record>,
}

impl Collection {
    pub fn new(shape: CollectionShape) -> Self {
        Self { shape, records: Vec::new() }
    }

    /// Identify every record in `payload`. Never fails: `null` is an empty
    /// collection, and a payload in the other shape is read in order.
    pub fn normalize(payload: Value, shape: CollectionShape) -> Self {
        let mut out = Self::new(shape);
        let bodies: Vec<(RecordId, Value)> = match (shape, payload) {
            (_, Value::Null) => Vec::new(),
            (CollectionShape::Mapped, Value::Object(map)) => map
                .into_iter()
                .map(|(k, body)| (RecordId::Name(k), body))
                .collect(),
            (CollectionShape::Indexed, Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, body)| (RecordId::Index(i), body))
                .collect(),
            (CollectionShape::Mapped, Value::Array(items)) => {
                tracing::debug!(len = items.len(), "mapped collection received a sequence; keying by position");
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, body)| (RecordId::Name(i.to_string()), body))
                    .collect()
            }
            (CollectionShape::Indexed, Value::Object(map)) => {
                tracing::debug!(len = map.len(), "indexed collection received a mapping; dropping its keys");
                map.into_iter()
                    .enumerate()
                    .map(|(i, (_, body))| (RecordId::Index(i), body))
                    .collect()
            }
            (_, other) => {
                tracing::debug!(shape = ?shape_of(&other), "collection payload is a scalar; treating as empty");
                Vec::new()
            }
        };
        for (id, body) in bodies {
            out.records.push(Record { id, body: RecordBody::from_wire(body) });
        }
        tracing::trace!(shape = ?out.shape, records = out.records.len(), "normalized collection");
        out
    }

    /// Back to wire shape: a mapping for mapped collections, a sequence of
    /// bodies for indexed ones.
    pub fn denormalize(&self) -> Value {
        match self.shape {
            CollectionShape::Mapped => {
                let map: Map<String, Value> = self
                    .records
                    .iter()
                    .map(|r| (r.id.to_string(), r.to_json()))
                    .collect();
                Value::Object(map)
            }
            CollectionShape::Indexed => {
                Value::Array(self.records.iter().map(Record::to_json).collect())
            }
        }
    }

    /// Add a raw body. An explicit `"id"` field is taken as the id and removed
    /// from the body, replacing any record with that id. Otherwise a mapped
    /// body `{name: {...}}` becomes the record `name` (every key of the
    /// wrapper, in order, replacing same-named records), and an indexed body
    /// is always appended under the next free position. Returns the ids
    /// written.
    pub fn add(&mut self, mut body: Value) -> Vec<RecordId> {
        if let Some(id) = body.as_object_mut().and_then(|m| m.shift_remove("id")) {
            let id = self.id_from_value(&id);
            self.upsert(id.clone(), body);
            return vec![id];
        }
        match self.shape {
            CollectionShape::Mapped => match body {
                Value::Object(wrapper) => wrapper
                    .into_iter()
                    .map(|(name, inner)| {
                        let id = RecordId::Name(name);
                        self.upsert(id.clone(), inner);
                        id
                    })
                    .collect(),
                other => {
                    tracing::warn!(shape = ?shape_of(&other), "mapped record without a name; ignored");
                    Vec::new()
                }
            },
            CollectionShape::Indexed => {
                let id = RecordId::Index(self.next_index());
                self.records.push(Record { id: id.clone(), body: RecordBody::from_wire(body) });
                vec![id]
            }
        }
    }

    pub fn shape(&self) -> CollectionShape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn get_mut(&mut self, id: &RecordId) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| &r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    fn upsert(&mut self, id: RecordId, body: Value) {
        let body = RecordBody::from_wire(body);
        match self.get_mut(&id) {
            Some(existing) => existing.body = body,
            None => self.records.push(Record { id, body }),
        }
    }

    /// The collection length, or past the highest explicit index if an
    /// earlier add claimed one at or beyond it.
    fn next_index(&self) -> usize {
        self.records
            .iter()
            .filter_map(|r| match r.id {
                RecordId::Index(i) => Some(i.saturating_add(1)),
                RecordId::Name(_) => None,
            })
            .fold(self.records.len(), usize::max)
    }

    fn id_from_value(&self, id: &Value) -> RecordId {
        match (self.shape, id) {
            (CollectionShape::Indexed, Value::Number(n)) => {
                match n.as_u64().and_then(|i| usize::try_from(i).ok()) {
                    Some(i) => RecordId::Index(i),
                    None => RecordId::Name(n.to_string()),
                }
            }
            (_, Value::String(s)) => RecordId::Name(s.clone()),
            (_, other) => RecordId::Name(other.to_string()),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mapped_ids_come_from_keys_in_order() {
        let payload = json!({"name": {"Value": {"value": "Test"}}, "owner": {"Value": {"value": "#2|obj"}}});
        let c = Collection::normalize(payload, CollectionShape::Mapped);
        let ids: Vec<String> = c.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec!["name", "owner"]);
        let name = c.get(&"name".into()).unwrap();
        assert_eq!(name.get("Value.value"), Some(&json!("Test")));
    }

    #[test]
    fn indexed_ids_are_positions() {
        let payload = json!([{"Verb": {"names": "look"}}, {"Verb": {"names": "get take"}}]);
        let c = Collection::normalize(payload, CollectionShape::Indexed);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(&RecordId::Index(1)).unwrap().get("Verb.names"), Some(&json!("get take")));
        assert_eq!(c.iter().next().unwrap().id(), &RecordId::Index(0));
    }

    #[test]
    fn round_trips_both_shapes() {
        let mapped = json!({"zeta": {"Value": {"value": 1}}, "alpha": {"Value": {"value": "a"}, "Meta": {"status": "readable"}}});
        let c = Collection::normalize(mapped.clone(), CollectionShape::Mapped);
        assert_eq!(c.denormalize(), mapped);

        let indexed = json!([{"Property": {"name": "x", "value": [1, 2]}}, {"Property": {"name": "y"}}]);
        let c = Collection::normalize(indexed.clone(), CollectionShape::Indexed);
        assert_eq!(c.denormalize(), indexed);
    }

    #[test]
    fn bodies_with_their_own_id_field_round_trip() {
        let indexed = json!([{"id": "keep-me", "x": 1}]);
        let c = Collection::normalize(indexed.clone(), CollectionShape::Indexed);
        assert_eq!(c.denormalize(), indexed);
    }

    #[test]
    fn null_and_scalar_payloads_are_empty() {
        assert!(Collection::normalize(Value::Null, CollectionShape::Mapped).is_empty());
        assert!(Collection::normalize(json!(5), CollectionShape::Indexed).is_empty());
        assert_eq!(Collection::normalize(Value::Null, CollectionShape::Indexed).denormalize(), json!([]));
    }

    #[test]
    fn mismatched_shapes_are_read_in_order() {
        let c = Collection::normalize(json!({"a": {"x": 1}, "b": {"x": 2}}), CollectionShape::Indexed);
        assert_eq!(c.denormalize(), json!([{"x": 1}, {"x": 2}]));
        let c = Collection::normalize(json!([{"x": 1}]), CollectionShape::Mapped);
        assert_eq!(c.denormalize(), json!({"0": {"x": 1}}));
    }

    #[test]
    fn indexed_add_appends_with_next_position() {
        let mut c = Collection::normalize(json!([{"a": 1}, {"a": 2}]), CollectionShape::Indexed);
        let ids = c.add(json!({"a": 3}));
        assert_eq!(ids, vec![RecordId::Index(2)]);
        assert_eq!(c.get(&RecordId::Index(2)).unwrap().get("a"), Some(&json!(3)));
        assert_eq!(c.add(json!({"a": 4})), vec![RecordId::Index(3)]);
    }

    #[test]
    fn mapped_add_unwraps_the_named_body() {
        let mut c = Collection::new(CollectionShape::Mapped);
        let ids = c.add(json!({"name": {"Value": {"value": "x"}}}));
        assert_eq!(ids, vec![RecordId::from("name")]);
        let record = c.get(&"name".into()).unwrap();
        assert_eq!(record.to_json(), json!({"Value": {"value": "x"}}));
        assert_eq!(c.denormalize(), json!({"name": {"Value": {"value": "x"}}}));
    }

    #[test]
    fn explicit_id_is_taken_and_stripped() {
        let mut c = Collection::new(CollectionShape::Mapped);
        c.add(json!({"id": "player", "Value": {"value": "test"}}));
        let record = c.get(&"player".into()).unwrap();
        assert_eq!(record.get("Value.value"), Some(&json!("test")));
        assert_eq!(record.get("id"), None);
        assert_eq!(c.denormalize(), json!({"player": {"Value": {"value": "test"}}}));
    }

    #[test]
    fn adding_an_existing_id_replaces_in_place() {
        let mut c = Collection::normalize(json!({"a": {"v": 1}, "b": {"v": 2}}), CollectionShape::Mapped);
        c.add(json!({"a": {"v": 9}}));
        assert_eq!(c.len(), 2);
        assert_eq!(c.denormalize(), json!({"a": {"v": 9}, "b": {"v": 2}}));
    }

    #[test]
    fn records_are_editable_through_paths() {
        let mut c = Collection::normalize(json!({"player": {"Value": {"value": 0}}}), CollectionShape::Mapped);
        c.get_mut(&"player".into()).unwrap().attributes_mut().set("Value.value", json!(1));
        assert_eq!(c.denormalize(), json!({"player": {"Value": {"value": 1}}}));
    }

    #[test]
    fn non_mapping_bodies_round_trip_verbatim() {
        let mapped = json!({"a": null, "b": 5, "c": {"x": 1}, "d": "#1|obj", "e": [1, 2]});
        let c = Collection::normalize(mapped.clone(), CollectionShape::Mapped);
        assert_eq!(c.denormalize(), mapped);
        assert_eq!(c.get(&"b".into()).unwrap().body(), &RecordBody::Raw(json!(5)));
        assert_eq!(c.get(&"b".into()).unwrap().get("x"), None);

        let indexed = json!(["s", [1, 2], {"x": 1}, null]);
        let c = Collection::normalize(indexed.clone(), CollectionShape::Indexed);
        assert_eq!(c.denormalize(), indexed);
    }

    #[test]
    fn dotted_wire_keys_round_trip_unexpanded() {
        let mapped = json!({"r": {"a.b": 1, "a": {"c": 2}}});
        let c = Collection::normalize(mapped.clone(), CollectionShape::Mapped);
        assert_eq!(c.denormalize(), mapped);
        assert_eq!(c.get(&"r".into()).unwrap().get("a.c"), Some(&json!(2)));
    }

    #[test]
    fn editing_a_raw_body_turns_it_into_attributes() {
        let mut c = Collection::normalize(json!({"v": 5}), CollectionShape::Mapped);
        c.get_mut(&"v".into()).unwrap().attributes_mut().set("Value.value", json!(1));
        assert_eq!(c.denormalize(), json!({"v": {"Value": {"value": 1}}}));
    }

    #[test]
    fn indexed_add_never_overwrites_an_explicit_index() {
        let mut c = Collection::new(CollectionShape::Indexed);
        assert_eq!(c.add(json!({"id": 1, "x": "explicit"})), vec![RecordId::Index(1)]);
        assert_eq!(c.add(json!({"x": "appended"})), vec![RecordId::Index(2)]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(&RecordId::Index(1)).unwrap().get("x"), Some(&json!("explicit")));
        assert_eq!(c.denormalize(), json!([{"x": "explicit"}, {"x": "appended"}]));
    }

    #[test]
    fn negative_explicit_index_becomes_a_name() {
        let mut c = Collection::new(CollectionShape::Indexed);
        let ids = c.add(json!({"id": -3, "x": 1}));
        assert_eq!(ids, vec![RecordId::Name("-3".to_string())]);
    }
}
