//! Binding Emitter: one [`GeneratedClass`] per message and enum.
//!
//! Nested types are emitted depth-first before their parent (nested enums,
//! then nested messages, then the message itself), file by file in schema
//! order. The aggregate enum table, when enabled, comes first.

use crate::host_types::{HostType, host_type, well_known_note};
use crate::ir::{
    Accessor, AccessorKind, ClassIndex, ClassOrigin, Constant, GeneratedClass, OneofGroup, Param,
    Property,
};
use crate::mapper::{MappedType, map_message};
use crate::naming::{class_name, to_constant_case, to_snake_case};
use gdbuf_core::{
    EnumId, GeneratorConfig, Location, Message, MessageId, Schema, SchemaError, SchemaResult,
};
use std::collections::{HashMap, HashSet};

/// Methods every message class defines besides its field accessors
pub const MESSAGE_METHODS: [&str; 3] = ["serialize", "parse", "get_descriptor_name"];

/// Base class of enum constant classes and the enum table
pub const ENUM_BASE_CLASS: &str = "Object";

/// Walks a [`Schema`] and produces the generated class set
pub struct BindingEmitter<'a> {
    schema: &'a Schema,
    config: &'a GeneratorConfig,
    classes: ClassIndex,
}

impl<'a> BindingEmitter<'a> {
    pub fn new(schema: &'a Schema, config: &'a GeneratorConfig) -> SchemaResult<Self> {
        let classes = ClassIndex::build(schema, config)?;
        Ok(Self {
            schema,
            config,
            classes,
        })
    }

    pub fn class_index(&self) -> &ClassIndex {
        &self.classes
    }

    /// Emit every class, in emission order
    pub fn emit(&self) -> SchemaResult<Vec<GeneratedClass>> {
        let mut out =
            Vec::with_capacity(self.schema.message_count() + self.schema.enum_count() + 1);

        if self.config.enum_table {
            out.push(self.emit_enum_table()?);
        }

        for file in self.schema.files() {
            for &id in &file.enums {
                out.push(self.emit_enum(id)?);
            }
            for &id in &file.messages {
                self.emit_message_tree(id, &mut out)?;
            }
            tracing::debug!("Emitted classes for {}", file.path);
        }

        tracing::info!(
            "Emitted {} classes from {} schema files",
            out.len(),
            self.schema.files().len()
        );
        Ok(out)
    }

    fn emit_message_tree(&self, id: MessageId, out: &mut Vec<GeneratedClass>) -> SchemaResult<()> {
        let message = self.schema.message(id);
        for &nested in &message.enums {
            out.push(self.emit_enum(nested)?);
        }
        for &nested in &message.messages {
            self.emit_message_tree(nested, out)?;
        }
        out.push(self.emit_message(id)?);
        Ok(())
    }

    /// Build the class for one message
    pub fn emit_message(&self, id: MessageId) -> SchemaResult<GeneratedClass> {
        let message = self.schema.message(id);
        let file = self.schema.file(message.file);
        let class = self.classes.get(&message.full_name).ok_or_else(|| {
            SchemaError::UnresolvedTypeReference {
                location: Location::message(&file.path, message.local_path.as_str()),
                type_name: message.full_name.clone(),
            }
        })?;

        let mapped = map_message(self.schema, message)?;
        let properties: Vec<Property> = message
            .fields
            .iter()
            .zip(mapped)
            .map(|(field, mapped)| {
                let host = host_type(&mapped, &self.classes);
                let method_stem = to_snake_case(&field.name);
                let accessors =
                    self.accessors(&method_stem, &mapped, &host, field.has_presence());
                Property {
                    name: field.name.clone(),
                    number: field.number,
                    docs: field_docs(field.docs.as_deref(), &mapped),
                    presence: field.has_presence(),
                    oneof: field.oneof,
                    mapped,
                    host,
                    accessors,
                }
            })
            .collect();

        let oneofs = message
            .oneofs
            .iter()
            .map(|oneof| OneofGroup {
                name: oneof.name.clone(),
                members: oneof
                    .fields
                    .iter()
                    .filter_map(|&i| message.fields.get(i))
                    .map(|f| f.name.clone())
                    .collect(),
                discriminator: format!("which_{}", to_snake_case(&oneof.name)),
                docs: oneof.docs.clone(),
            })
            .collect();

        let generated = GeneratedClass {
            name: class.name.clone(),
            namespace: class.namespace.clone(),
            schema_name: message.full_name.clone(),
            source_file: file.path.clone(),
            origin: ClassOrigin::Message(id),
            base: self.config.base_class.clone(),
            properties,
            oneofs,
            constants: Vec::new(),
            docs: message.docs.clone(),
        };
        check_method_names(&generated, message, &file.path)?;

        tracing::debug!(
            "Emitted class {} for {}",
            generated.qualified_name(),
            generated.schema_name
        );
        Ok(generated)
    }

    /// Build the constants class for one enum
    pub fn emit_enum(&self, id: EnumId) -> SchemaResult<GeneratedClass> {
        let enum_type = self.schema.enum_type(id);
        let file = self.schema.file(enum_type.file);
        let class = self.classes.get(&enum_type.full_name).ok_or_else(|| {
            SchemaError::UnresolvedTypeReference {
                location: Location::message(&file.path, enum_type.local_path.as_str()),
                type_name: enum_type.full_name.clone(),
            }
        })?;

        Ok(GeneratedClass {
            name: class.name.clone(),
            namespace: class.namespace.clone(),
            schema_name: enum_type.full_name.clone(),
            source_file: file.path.clone(),
            origin: ClassOrigin::Enum(id),
            base: ENUM_BASE_CLASS.to_string(),
            properties: Vec::new(),
            oneofs: Vec::new(),
            constants: enum_type
                .values
                .iter()
                .map(|v| Constant {
                    name: v.name.clone(),
                    value: i64::from(v.number),
                    docs: v.docs.clone(),
                })
                .collect(),
            docs: enum_type.docs.clone(),
        })
    }

    /// The `<extension>Enums` class with every enum value of the schema
    ///
    /// Constants are named `<ENUM_CLASS>_<VALUE>`. Two enums whose class
    /// names fold to the same prefix (`HttpCode` and `HTTPCode`) fail with
    /// [`SchemaError::DuplicateName`].
    pub fn emit_enum_table(&self) -> SchemaResult<GeneratedClass> {
        let table = self.config.enum_table_class();
        let mut owners: HashMap<String, &str> = HashMap::new();
        let mut constants = Vec::new();

        for (_, enum_type) in self.schema.enums() {
            let prefix = to_constant_case(&class_name(&enum_type.local_path));
            if let Some(owner) = owners.insert(prefix.clone(), enum_type.full_name.as_str()) {
                let file = self.schema.file(enum_type.file);
                tracing::debug!(
                    "{} and {} share constant prefix {}",
                    owner,
                    enum_type.full_name,
                    prefix
                );
                return Err(SchemaError::DuplicateName {
                    location: Location::message(&file.path, enum_type.local_path.as_str()),
                    scope: table,
                    name: prefix,
                });
            }
            constants.extend(enum_type.values.iter().map(|v| Constant {
                name: format!("{prefix}_{}", v.name),
                value: i64::from(v.number),
                docs: v.docs.clone(),
            }));
        }

        Ok(GeneratedClass {
            name: table,
            namespace: self.config.namespace.clone(),
            schema_name: String::new(),
            source_file: String::new(),
            origin: ClassOrigin::EnumTable,
            base: ENUM_BASE_CLASS.to_string(),
            properties: Vec::new(),
            oneofs: Vec::new(),
            constants,
            docs: Some(format!(
                "Every enum value declared by the {} schema set.",
                self.config.extension_name
            )),
        })
    }

    fn accessors(
        &self,
        f: &str,
        mapped: &MappedType,
        host: &HostType,
        presence: bool,
    ) -> Vec<Accessor> {
        use AccessorKind as K;

        let index = || Param::new("index", HostType::int64());
        let key = |host: &HostType| Param::new("key", host.clone());
        let value = |host: &HostType| Param::new("value", host.clone());
        let size = || Some(HostType::int64());
        let flag = || Some(HostType::boolean());

        match mapped {
            MappedType::WellKnown(_) if mapped.is_any() => {
                let object = HostType::ref_counted();
                let type_name = Param::new("type_name", HostType::string());
                vec![
                    accessor(K::Pack, format!("pack_{f}"), vec![value(&object)], None),
                    accessor(K::Unpack, format!("unpack_{f}"), vec![type_name], Some(object)),
                    accessor(K::TypeUrl, format!("get_{f}_type_url"), vec![], Some(HostType::string())),
                    accessor(K::Has, format!("has_{f}"), vec![], flag()),
                    accessor(K::Clear, format!("clear_{f}"), vec![], None),
                ]
            }
            MappedType::Repeated(inner) => {
                let element = host_type(inner, &self.classes);
                vec![
                    accessor(K::Get, format!("get_{f}"), vec![], Some(host.clone())),
                    accessor(K::Set, format!("set_{f}"), vec![value(host)], None),
                    accessor(K::Size, format!("{f}_size"), vec![], size()),
                    accessor(K::Append, format!("add_{f}"), vec![value(&element)], None),
                    accessor(K::GetAt, format!("get_{f}_at"), vec![index()], Some(element.clone())),
                    accessor(K::SetAt, format!("set_{f}_at"), vec![index(), value(&element)], None),
                    accessor(K::RemoveAt, format!("remove_{f}_at"), vec![index()], None),
                    accessor(K::Clear, format!("clear_{f}"), vec![], None),
                ]
            }
            MappedType::Map(k, v) => {
                let k = host_type(k, &self.classes);
                let v = host_type(v, &self.classes);
                vec![
                    accessor(K::Get, format!("get_{f}"), vec![], Some(host.clone())),
                    accessor(K::Set, format!("set_{f}"), vec![value(host)], None),
                    accessor(K::MapGet, format!("{f}_get"), vec![key(&k)], Some(v.clone())),
                    accessor(K::MapPut, format!("{f}_put"), vec![key(&k), value(&v)], None),
                    accessor(K::MapErase, format!("{f}_erase"), vec![key(&k)], flag()),
                    accessor(K::MapContains, format!("{f}_contains"), vec![key(&k)], flag()),
                    accessor(K::Size, format!("{f}_size"), vec![], size()),
                    accessor(K::Clear, format!("clear_{f}"), vec![], None),
                ]
            }
            _ => {
                let mut get = accessor(K::Get, format!("get_{f}"), vec![], Some(host.clone()));
                // Message getters construct the sub-object on first access.
                get.is_const = !matches!(mapped, MappedType::MessageRef(_));
                let mut methods = vec![get, accessor(K::Set, format!("set_{f}"), vec![value(host)], None)];
                if presence {
                    methods.push(accessor(K::Has, format!("has_{f}"), vec![], flag()));
                }
                methods.push(accessor(K::Clear, format!("clear_{f}"), vec![], None));
                methods
            }
        }
    }
}

fn accessor(
    kind: AccessorKind,
    method: String,
    params: Vec<Param>,
    returns: Option<HostType>,
) -> Accessor {
    Accessor {
        kind,
        method,
        params,
        returns,
        is_const: kind.is_read_only(),
    }
}

/// Field docs with the well-known-type note appended
fn field_docs(docs: Option<&str>, mapped: &MappedType) -> Option<String> {
    let note = match mapped {
        MappedType::WellKnown(wkt) => well_known_note(*wkt),
        _ => None,
    };
    match (docs, note) {
        (Some(docs), Some(note)) => Some(format!("{docs}\n{note}")),
        (Some(docs), None) => Some(docs.to_string()),
        (None, Some(note)) => Some(note.to_string()),
        (None, None) => None,
    }
}

/// Reject classes where two accessors (or a discriminator) share a method name
fn check_method_names(class: &GeneratedClass, message: &Message, file: &str) -> SchemaResult<()> {
    let mut seen: HashSet<&str> = MESSAGE_METHODS.into_iter().collect();

    let duplicate = |field: &str, method: &str| SchemaError::DuplicateName {
        location: Location::field(file, message.local_path.as_str(), field),
        scope: class.qualified_name(),
        name: method.to_string(),
    };

    for (property, accessor) in class.accessors() {
        if !seen.insert(&accessor.method) {
            return Err(duplicate(&property.name, &accessor.method));
        }
    }
    for oneof in &class.oneofs {
        if !seen.insert(&oneof.discriminator) {
            return Err(duplicate(&oneof.name, &oneof.discriminator));
        }
    }
    Ok(())
}
