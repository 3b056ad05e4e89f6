//! A server object payload split into its four record collections.
//!
//! ```json
//! {
//!   "Meta": {"id": 12, "status": "writable"},
//!   "Attributes": {"player": {"Value": {"value": 0}}},
//!   "Values": {"name": {"Value": {"value": "Test"}}},
//!   "Properties": [{"Property": {"name": "desc", "value": "..."}}],
//!   "Verbs": [{"Verb": {"names": "look", "code": []}}]
//! }
//! ```
use serde_json::{Map, Value};

use crate::collection::{Collection, CollectionShape, Record};
use crate::error::{Error, Result};
use crate::store::NestedStore;

const ATTRIBUTES: &str = "Attributes";
const VALUES: &str = "Values";
const PROPERTIES: &str = "Properties";
const VERBS: &str = "Verbs";

/// Access level the server reports in a `Meta.status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Readable,
    Writable,
    Denied,
    Unknown,
}

impl Status {
    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("readable") => Status::Readable,
            Some("writable") => Status::Writable,
            Some("denied") => Status::Denied,
            _ => Status::Unknown,
        }
    }

    /// Writable implies readable.
    pub fn can_read(self) -> bool {
        matches!(self, Status::Readable | Status::Writable)
    }
}

pub fn record_status(record: &Record) -> Status {
    Status::from_value(record.get("Meta.status"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDocument {
    pub attributes: Collection,
    pub values: Collection,
    pub properties: Collection,
    pub verbs: Collection,
    /// Everything else in the payload, `Meta` included.
    pub rest: NestedStore,
}

impl Default for ObjectDocument {
    fn default() -> Self {
        Self {
            attributes: Collection::new(CollectionShape::Mapped),
            values: Collection::new(CollectionShape::Mapped),
            properties: Collection::new(CollectionShape::Indexed),
            verbs: Collection::new(CollectionShape::Indexed),
            rest: NestedStore::default(),
        }
    }
}

impl ObjectDocument {
    pub fn parse(payload: Value) -> Result<Self> {
        let mut map = match payload {
            Value::Object(map) => map,
            other => return Err(Error::NotAnObject { found: kind_name(&other) }),
        };
        let mut take = |key: &str| map.shift_remove(key).unwrap_or(Value::Null);
        let attributes = Collection::normalize(take(ATTRIBUTES), CollectionShape::Mapped);
        let values = Collection::normalize(take(VALUES), CollectionShape::Mapped);
        let properties = Collection::normalize(take(PROPERTIES), CollectionShape::Indexed);
        let verbs = Collection::normalize(take(VERBS), CollectionShape::Indexed);
        let doc = Self {
            attributes,
            values,
            properties,
            verbs,
            rest: NestedStore::new(map),
        };
        tracing::debug!(
            id = ?doc.id(),
            attributes = doc.attributes.len(),
            values = doc.values.len(),
            properties = doc.properties.len(),
            verbs = doc.verbs.len(),
            "parsed object document"
        );
        Ok(doc)
    }

    /// `Meta.id`, when the server sent one.
    pub fn id(&self) -> Option<&Value> {
        self.rest.get("Meta.id")
    }

    pub fn status(&self) -> Status {
        Status::from_value(self.rest.get("Meta.status"))
    }

    /// The four collections in wire shape, ready to send back.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(ATTRIBUTES.to_string(), self.attributes.denormalize());
        map.insert(VALUES.to_string(), self.values.denormalize());
        map.insert(PROPERTIES.to_string(), self.properties.denormalize());
        map.insert(VERBS.to_string(), self.verbs.denormalize());
        Value::Object(map)
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

// ------------------------------- Tests ------------------------------------ //
