//! gdbuf-core - Schema model, error taxonomy and configuration
//!
//! This crate provides the foundational types shared by the gdbuf generator:
//! - [`Schema`] and [`SchemaBuilder`] for the resolved protobuf schema model
//! - [`SchemaError`] for malformed or ambiguous schemas
//! - [`GeneratorConfig`] for generator configuration (`gdbuf.toml`)
//! - [`InitializationLevel`] for the host initialization phases

mod config;
mod error;
mod phase;
pub mod schema;

pub use config::GeneratorConfig;
pub use error::{ConfigError, Location, SchemaError, SchemaResult};
pub use phase::InitializationLevel;
pub use schema::{
    Enum, EnumId, EnumValue, Field, FieldType, FileId, Label, MapType, Message, MessageId, Oneof,
    ScalarKind, Schema, SchemaBuilder, SchemaFile, Syntax, TypeId, WellKnownType,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::schema::def::{EnumDef, FieldDef, FileDef, MessageDef, OneofDef, TypeDef};
    pub use crate::{
        FieldType, GeneratorConfig, InitializationLevel, Label, Location, MessageId, ScalarKind,
        Schema, SchemaBuilder, SchemaError, SchemaResult, WellKnownType,
    };
}
