//! gdbuf-codegen - Binding generation from a validated schema
//!
//! # Architecture
//!
//! ```text
//! Schema
//!     ↓
//!  [Type Mapper]          mapper, host_types
//!     ↓
//!  [Binding Emitter]      emitter → GeneratedClass (ir)
//!     ↓
//!  [Registration Table]   registration
//!     ↓
//!  ├─→ [C++ writer]       src/*.h, src/*.cpp, register_types, .gdextension
//!  ├─→ [Docs writer]      doc_classes/*.xml
//!  └─→ [Manifest]         gdbuf_manifest.json
//! ```
//!
//! Everything is rendered into a [`GeneratedOutput`] before any file is
//! written, so a [`SchemaError`] anywhere in the pipeline leaves the output
//! directory untouched.
//!
//! # Usage
//!
//! ```rust,no_run
//! use gdbuf_codegen::Generator;
//! use gdbuf_core::{GeneratorConfig, Schema};
//! # fn run(schema: &Schema) -> anyhow::Result<()> {
//! let generation = Generator::new(GeneratorConfig::default()).generate(schema)?;
//! generation.output.write_to(std::path::Path::new("genout"))?;
//! # Ok(())
//! # }
//! ```

mod cpp;
mod docs;
mod emitter;
pub mod host_types;
pub mod ir;
mod manifest;
pub mod mapper;
pub mod naming;
mod output;
mod registration;

pub use cpp::CppWriter;
pub use docs::{render_class_doc, write_docs};
pub use emitter::{BindingEmitter, ENUM_BASE_CLASS, MESSAGE_METHODS};
pub use ir::{
    Accessor, AccessorKind, ClassIndex, ClassOrigin, ClassRef, Constant, GeneratedClass,
    OneofGroup, Param, Property, Reference,
};
pub use manifest::{MANIFEST_FILE, generate_manifest, render_manifest};
pub use mapper::{MappedType, map_field, map_message};
pub use output::GeneratedOutput;
pub use registration::{RegistrationEntry, RegistrationTable};

use gdbuf_core::{GeneratorConfig, Schema, SchemaError};

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct Generation {
    /// Classes in emission order
    pub classes: Vec<GeneratedClass>,
    pub table: RegistrationTable,
    pub output: GeneratedOutput,
}

impl Generation {
    /// Generated class by qualified C++ name
    pub fn class(&self, qualified_name: &str) -> Option<&GeneratedClass> {
        self.classes
            .iter()
            .find(|c| c.qualified_name() == qualified_name)
    }

    /// Number of classes generated for messages
    pub fn message_class_count(&self) -> usize {
        self.classes.iter().filter(|c| c.is_message()).count()
    }
}

/// Runs the full generation pipeline with one configuration
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Emit, order and render every class of `schema`
    pub fn generate(&self, schema: &Schema) -> Result<Generation, SchemaError> {
        let classes = BindingEmitter::new(schema, &self.config)?.emit()?;
        let table = RegistrationTable::build(&classes, self.config.initialization_level)?;

        let mut output = GeneratedOutput::new();
        CppWriter::new(&self.config, &classes, &table).write(&mut output);
        if self.config.emit_docs {
            write_docs(&classes, &mut output);
        }
        output.add(
            MANIFEST_FILE,
            render_manifest(&self.config, &classes, &table),
        );

        tracing::info!(
            "Generated {} classes into {} files",
            classes.len(),
            output.len()
        );
        Ok(Generation {
            classes,
            table,
            output,
        })
    }
}
