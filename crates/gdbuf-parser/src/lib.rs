//! gdbuf-parser - Schema ingestion
//!
//! Turns protobuf schemas into [`FileDef`](gdbuf_core::prelude::FileDef)
//! definitions ready for [`SchemaBuilder`](gdbuf_core::SchemaBuilder):
//! - [`parse_proto`] for `.proto` source text
//! - [`decode_descriptor_set`] for binary descriptor sets
//! - [`SchemaLoader`] for schema directories with imports

mod comments;
mod descriptor;
mod loader;
mod parser;

pub use descriptor::{decode_descriptor_set, from_descriptor_set};
pub use loader::{SchemaLoader, load_descriptor_set};
pub use parser::parse_proto;
