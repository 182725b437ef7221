//! gdbuf-host - Host adapter for generated classes
//!
//! This crate connects a generation run to a host class database:
//! - [`ClassDescriptor`] translates a generated class into what the host registers
//! - [`HostRegistry`] is the registration seam; [`InMemoryRegistry`] implements it
//! - [`Registrar`] registers a table once, guarded by [`InitializationLevel`]
//! - [`MessageObject`] drives a registered class through its accessor contract
//!
//! # Example
//!
//! ```rust,no_run
//! use gdbuf_codegen::Generator;
//! use gdbuf_core::{InitializationLevel, Schema};
//! use gdbuf_host::{InMemoryRegistry, Registrar};
//! # fn run(schema: &Schema) -> anyhow::Result<()> {
//! let generation = Generator::default().generate(schema)?;
//! let registry = InMemoryRegistry::new();
//! let registrar = Registrar::from_generation(&generation);
//! registrar.initialize(InitializationLevel::Scene, &registry)?;
//! let player = registry.instantiate("Player")?;
//! player.lock().set("name", "ada")?;
//! # Ok(())
//! # }
//! ```

mod descriptor;
mod error;
mod object;
mod registrar;
mod registry;
mod state;
mod value;

pub use descriptor::{
    ClassDescriptor, ClassKind, MethodBinding, MethodDescriptor, OneofDescriptor,
    PropertyDescriptor, PropertyShape, TypeHint, describe,
};
pub use error::{HostError, HostResult, ObjectError, ObjectResult};
pub use gdbuf_core::InitializationLevel;
pub use object::{MessageObject, ObjectRef, TYPE_URL_PREFIX};
pub use registrar::Registrar;
pub use registry::{HostRegistry, InMemoryRegistry};
pub use state::RegistrationState;
pub use value::{MapKey, Value};
