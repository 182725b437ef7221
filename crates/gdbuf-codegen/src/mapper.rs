//! Type Mapper: resolved schema fields → binding-level types.
//!
//! The mapper is pure and total over any field of a validated [`Schema`]; it
//! never touches the filesystem. Message and enum references always carry the
//! fully-qualified schema name so that same-named nested types in different
//! scopes never collide.

use gdbuf_core::{
    Field, FieldType, Location, Message, ScalarKind, Schema, SchemaError, SchemaResult,
    WellKnownType,
};
use std::fmt;

/// Binding-level shape of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedType {
    Scalar(ScalarKind),
    /// Fully-qualified enum name
    EnumRef(String),
    /// Fully-qualified message name
    MessageRef(String),
    WellKnown(WellKnownType),
    Repeated(Box<MappedType>),
    Map(Box<MappedType>, Box<MappedType>),
}

impl MappedType {
    /// The message this type points at, looking through containers
    pub fn referenced_message(&self) -> Option<&str> {
        match self {
            MappedType::MessageRef(name) => Some(name),
            MappedType::Repeated(inner) => inner.referenced_message(),
            MappedType::Map(_, value) => value.referenced_message(),
            _ => None,
        }
    }

    /// Element type of a repeated field
    pub fn element(&self) -> Option<&MappedType> {
        match self {
            MappedType::Repeated(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, MappedType::Repeated(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, MappedType::Map(..))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, MappedType::WellKnown(WellKnownType::Any))
    }
}

impl fmt::Display for MappedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappedType::Scalar(kind) => write!(f, "{kind}"),
            MappedType::EnumRef(name) => write!(f, "enum {name}"),
            MappedType::MessageRef(name) => write!(f, "message {name}"),
            MappedType::WellKnown(wkt) => write!(f, "{wkt}"),
            MappedType::Repeated(inner) => write!(f, "repeated {inner}"),
            MappedType::Map(key, value) => write!(f, "map<{key}, {value}>"),
        }
    }
}

/// Map one field of `message` to its binding-level type
///
/// Fails with [`SchemaError::InvalidNesting`] for a repeated map, which the
/// schema language has no encoding for.
pub fn map_field(schema: &Schema, message: &Message, field: &Field) -> SchemaResult<MappedType> {
    let mapped = map_type(schema, &field.ty);

    if !field.is_repeated() {
        return Ok(mapped);
    }
    if mapped.is_map() {
        return Err(SchemaError::InvalidNesting {
            location: Location::field(
                &schema.file(message.file).path,
                &message.local_path,
                &field.name,
            ),
            reason: "map fields cannot be repeated".to_string(),
        });
    }
    Ok(MappedType::Repeated(Box::new(mapped)))
}

/// Map every field of a message, in declaration order
pub fn map_message(schema: &Schema, message: &Message) -> SchemaResult<Vec<MappedType>> {
    message
        .fields
        .iter()
        .map(|field| map_field(schema, message, field))
        .collect()
}

fn map_type(schema: &Schema, ty: &FieldType) -> MappedType {
    match ty {
        FieldType::Scalar(kind) => MappedType::Scalar(*kind),
        FieldType::Enum(id) => MappedType::EnumRef(schema.enum_type(*id).full_name.clone()),
        FieldType::Message(id) => MappedType::MessageRef(schema.message(*id).full_name.clone()),
        FieldType::WellKnown(wkt) => MappedType::WellKnown(*wkt),
        FieldType::Map(map) => MappedType::Map(
            Box::new(map_type(schema, &map.key)),
            Box::new(map_type(schema, &map.value)),
        ),
    }
}
