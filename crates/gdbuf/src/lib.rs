//! # gdbuf
//!
//! Generate Godot GDExtension bindings from protobuf schemas.
//!
//! gdbuf reads `.proto` files (or a `protoc` descriptor set) and emits, for
//! every message and enum, a native class exposing its fields to the host
//! class database, plus the glue that registers those classes once at a
//! guarded initialization level:
//! - one C++ header/source pair per schema file
//! - `register_types.cpp` with a dependency-ordered registration list
//! - `doc_classes/*.xml` reference pages and a `.gdextension` descriptor
//! - `gdbuf_manifest.json` describing every generated class
//!
//! ## Generating bindings
//!
//! ```rust,no_run
//! use gdbuf::prelude::*;
//! use std::path::Path;
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let schema = SchemaLoader::new("proto").load_schema()?;
//! let generation = Generator::new(GeneratorConfig::default()).generate(&schema)?;
//! generation.output.write_to(Path::new("genout"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving generated classes without the engine
//!
//! ```rust,no_run
//! use gdbuf::prelude::*;
//!
//! # fn run(generation: &Generation) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let registry = InMemoryRegistry::new();
//! Registrar::from_generation(generation).initialize(InitializationLevel::Scene, &registry)?;
//!
//! let player = registry.instantiate("Player")?;
//! player.call("set_name", &[Value::from("ada")])?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`gdbuf_core`] - Schema model, validation, configuration
//! - [`gdbuf_parser`] - `.proto` and descriptor-set ingestion
//! - [`gdbuf_codegen`] - Type mapping, binding emission, source writers
//! - [`gdbuf_host`] - Registration adapter and dynamic message objects

// Re-export schema types
pub use gdbuf_core::{
    ConfigError, Field, FieldType, GeneratorConfig, InitializationLevel, Label, Location, Message,
    MessageId, ScalarKind, Schema, SchemaBuilder, SchemaError, SchemaResult, WellKnownType,
};

// Re-export ingestion
pub use gdbuf_parser::{
    SchemaLoader, decode_descriptor_set, from_descriptor_set, load_descriptor_set, parse_proto,
};

// Re-export generation
pub use gdbuf_codegen::{
    GeneratedClass, GeneratedOutput, Generation, Generator, MANIFEST_FILE, RegistrationEntry,
    RegistrationTable,
};

// Re-export the host adapter
pub use gdbuf_host::{
    ClassDescriptor, HostError, HostRegistry, InMemoryRegistry, MessageObject, ObjectError,
    ObjectRef, Registrar, RegistrationState, Value,
};

pub use tracing;

/// Schema definition builders, for constructing schemas in code
pub mod def {
    pub use gdbuf_core::prelude::{EnumDef, FieldDef, FileDef, MessageDef, OneofDef, TypeDef};
}

/// Prelude module for convenient imports.
///
/// Use `use gdbuf::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::def::{EnumDef, FieldDef, FileDef, MessageDef};
    pub use crate::{
        GeneratorConfig, Generation, Generator, HostRegistry, InMemoryRegistry,
        InitializationLevel, ObjectRef, Registrar, Schema, SchemaBuilder, SchemaError,
        SchemaLoader, Value,
    };
}
