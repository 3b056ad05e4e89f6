//! Codec, dotted-path store and record normalizer for values exchanged with
//! a MOO object server.
//!
//! Scalars arrive as tagged strings (`"5|int"`, `"#3|obj"`, `"E_PERM|err"`).
//! [`literal`] and [`markup`] turn any value into editable literal text or
//! escaped HTML; [`store`] reads and writes nested attributes by dotted path;
//! [`collection`] and [`object`] give identity to the records of a payload.
pub mod collection;
pub mod error;
pub mod jq_exec;
pub mod literal;
pub mod markup;
pub mod object;
pub mod path_de;
pub mod store;
pub mod tag;
pub mod value;

pub use collection::{Collection, CollectionShape, Record, RecordBody, RecordId};
pub use error::{Error, Result};
pub use literal::{to_literal, to_literal_pretty, Layout};
pub use markup::to_markup;
pub use object::{ObjectDocument, Status};
pub use store::NestedStore;
pub use tag::{classify, decode, is_error, is_object_ref, is_string, TagKind, TaggedScalar};
pub use value::{shape_of, Shape};
