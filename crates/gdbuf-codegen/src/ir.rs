//! Intermediate representation of generated classes.
//!
//! The [`BindingEmitter`](crate::BindingEmitter) turns a [`Schema`] into
//! [`GeneratedClass`] values; every writer (C++ sources, docs, manifest) and
//! the host adapter consume this representation, never the schema directly.
//!
//! # Structure
//!
//! - [`GeneratedClass`]: one per message, per enum, plus the enum table
//! - [`Property`]: one per field, with its mapped and host types
//! - [`Accessor`]: one per emitted method
//! - [`OneofGroup`]: members and discriminator of a oneof
//! - [`ClassIndex`]: schema name → host class lookup used while mapping

use crate::host_types::HostType;
use crate::mapper::MappedType;
use crate::naming::{class_name, to_identifier};
use gdbuf_core::{EnumId, GeneratorConfig, Location, MessageId, Schema, SchemaError, SchemaResult};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Where a generated class came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOrigin {
    Message(MessageId),
    Enum(EnumId),
    /// Aggregate class holding every enum value as a constant
    EnumTable,
}

/// The binding emitter's output unit
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedClass {
    /// Host class name (`OuterInner`)
    pub name: String,
    /// C++ namespace (`gdbuf::game`)
    pub namespace: String,
    /// Fully-qualified schema name; empty for the enum table
    pub schema_name: String,
    /// Schema file the type is declared in; empty for the enum table
    pub source_file: String,
    pub origin: ClassOrigin,
    pub base: String,
    pub properties: Vec<Property>,
    pub oneofs: Vec<OneofGroup>,
    pub constants: Vec<Constant>,
    pub docs: Option<String>,
}

/// A message-typed property pointing at another generated class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    pub property: &'a str,
    /// Fully-qualified schema name of the target
    pub target: &'a str,
}

impl GeneratedClass {
    /// `namespace::Name`
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }

    pub fn is_message(&self) -> bool {
        matches!(self.origin, ClassOrigin::Message(_))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Message references of every property, in property order
    pub fn references(&self) -> Vec<Reference<'_>> {
        self.properties
            .iter()
            .filter_map(|p| {
                p.mapped.referenced_message().map(|target| Reference {
                    property: &p.name,
                    target,
                })
            })
            .collect()
    }

    /// Every accessor of every property
    pub fn accessors(&self) -> impl Iterator<Item = (&Property, &Accessor)> {
        self.properties
            .iter()
            .flat_map(|p| p.accessors.iter().map(move |a| (p, a)))
    }
}

/// One exposed field
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub number: u32,
    pub mapped: MappedType,
    pub host: HostType,
    /// Absence is distinguishable from the default value
    pub presence: bool,
    /// Index into the owning class's `oneofs`
    pub oneof: Option<usize>,
    pub accessors: Vec<Accessor>,
    pub docs: Option<String>,
}

impl Property {
    pub fn accessor(&self, kind: AccessorKind) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.kind == kind)
    }

    pub fn getter(&self) -> Option<&str> {
        self.accessor(AccessorKind::Get).map(|a| a.method.as_str())
    }

    pub fn setter(&self) -> Option<&str> {
        self.accessor(AccessorKind::Set).map(|a| a.method.as_str())
    }
}

/// What an accessor does to its property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Has,
    Clear,
    Size,
    Append,
    GetAt,
    SetAt,
    RemoveAt,
    MapGet,
    MapPut,
    MapErase,
    MapContains,
    Pack,
    Unpack,
    TypeUrl,
}

impl AccessorKind {
    /// Whether the accessor leaves the instance unchanged
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            AccessorKind::Get
                | AccessorKind::Has
                | AccessorKind::Size
                | AccessorKind::GetAt
                | AccessorKind::MapGet
                | AccessorKind::MapContains
                | AccessorKind::TypeUrl
        )
    }
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Has => "has",
            AccessorKind::Clear => "clear",
            AccessorKind::Size => "size",
            AccessorKind::Append => "append",
            AccessorKind::GetAt => "get_at",
            AccessorKind::SetAt => "set_at",
            AccessorKind::RemoveAt => "remove_at",
            AccessorKind::MapGet => "map_get",
            AccessorKind::MapPut => "map_put",
            AccessorKind::MapErase => "map_erase",
            AccessorKind::MapContains => "map_contains",
            AccessorKind::Pack => "pack",
            AccessorKind::Unpack => "unpack",
            AccessorKind::TypeUrl => "type_url",
        };
        f.write_str(name)
    }
}

/// One emitted method
#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub method: String,
    pub params: Vec<Param>,
    /// `None` for `void`
    pub returns: Option<HostType>,
    /// Emitted as a `const` member function
    pub is_const: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub host: HostType,
}

impl Param {
    pub fn new(name: &str, host: HostType) -> Self {
        Self {
            name: name.to_string(),
            host,
        }
    }
}

/// A oneof as exposed on the generated class
#[derive(Debug, Clone, PartialEq)]
pub struct OneofGroup {
    pub name: String,
    /// Member property names, in field order
    pub members: Vec<String>,
    /// `which_<oneof>` method name
    pub discriminator: String,
    pub docs: Option<String>,
}

/// Integer constant on an enum class or the enum table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    pub value: i64,
    pub docs: Option<String>,
}

/// Host class of a schema type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef {
    pub namespace: String,
    pub name: String,
}

impl ClassRef {
    pub fn qualified(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }
}

/// Lookup from fully-qualified schema names to host classes
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    classes: HashMap<String, ClassRef>,
    enum_hints: HashMap<String, String>,
}

impl ClassIndex {
    /// Assign a host class to every message and enum of `schema`
    ///
    /// The host class database is flat, so every class name must be unique
    /// across all files, and none may shadow the `<extension>Enums` table.
    /// A clash such as `A.BC` and `AB.C`, or `a.Foo` and `b.Foo` in two
    /// files, fails with [`SchemaError::DuplicateName`].
    pub fn build(schema: &Schema, config: &GeneratorConfig) -> SchemaResult<Self> {
        let mut index = ClassIndex::default();
        let mut taken: HashSet<String> = HashSet::new();
        if config.enum_table {
            taken.insert(config.enum_table_class());
        }

        let types = schema
            .messages()
            .map(|(_, m)| (m.file, &m.full_name, &m.local_path))
            .chain(schema.enums().map(|(_, e)| (e.file, &e.full_name, &e.local_path)));

        for (file_id, full_name, local_path) in types {
            let file = schema.file(file_id);
            let class = ClassRef {
                namespace: file_namespace(config, file.stem()),
                name: class_name(local_path),
            };
            if !taken.insert(class.name.clone()) {
                return Err(SchemaError::DuplicateName {
                    location: Location::message(&file.path, local_path.as_str()),
                    scope: config.namespace.clone(),
                    name: class.name,
                });
            }
            index.classes.insert(full_name.clone(), class);
        }

        for (_, enum_type) in schema.enums() {
            let hint = enum_type
                .values
                .iter()
                .map(|v| format!("{}:{}", v.name, v.number))
                .collect::<Vec<_>>()
                .join(",");
            index.enum_hints.insert(enum_type.full_name.clone(), hint);
        }

        Ok(index)
    }

    pub fn get(&self, full_name: &str) -> Option<&ClassRef> {
        self.classes.get(full_name.strip_prefix('.').unwrap_or(full_name))
    }

    /// `NAME:value,...` editor hint for an enum
    pub fn enum_hint(&self, full_name: &str) -> Option<&str> {
        self.enum_hints.get(full_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// C++ namespace for classes declared in a schema file
pub fn file_namespace(config: &GeneratorConfig, stem: &str) -> String {
    format!("{}::{}", config.namespace, to_identifier(stem))
}
