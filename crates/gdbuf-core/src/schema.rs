//! Resolved protobuf schema model
//!
//! Schema files are first described with the unresolved [`def`] types (as
//! produced by the parser or descriptor reader), then handed to a
//! [`SchemaBuilder`] which resolves every type reference and validates the
//! whole set before yielding an immutable [`Schema`].

mod builder;
pub mod def;
mod model;
mod types;

pub use builder::SchemaBuilder;
pub use model::{
    Enum, EnumId, EnumValue, Field, FieldType, FileId, MapType, Message, MessageId, Oneof, Schema,
    SchemaFile, TypeId,
};
pub use types::{Label, MAX_FIELD_NUMBER, ScalarKind, Syntax, WellKnownType};
