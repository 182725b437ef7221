//! Two-phase schema resolution
//!
//! ```text
//! FileDef* ──declare──▶ names + ids ──resolve──▶ FieldType per field ──validate──▶ Schema
//! ```
//!
//! Every message and enum is declared before any field is resolved, so
//! forward references and (mutually) recursive messages need no special
//! handling.

use super::def::{EnumDef, FileDef, MessageDef, TypeDef};
use super::model::{
    Enum, EnumId, EnumValue, Field, FieldType, FileId, MapType, Message, MessageId, Oneof, Schema,
    SchemaFile, TypeId,
};
use super::types::{Label, MAX_FIELD_NUMBER, ScalarKind, Syntax, WellKnownType};
use crate::error::{Location, SchemaError, SchemaResult};
use std::collections::{HashMap, HashSet};

/// Field numbers the wire format keeps for itself
const IMPLEMENTATION_RESERVED: std::ops::RangeInclusive<i64> = 19_000..=19_999;

/// Collects schema files and resolves them into a [`Schema`]
///
/// # Example
///
/// ```
/// use gdbuf_core::prelude::*;
///
/// let schema = SchemaBuilder::new()
///     .with_file(
///         FileDef::new("tree.proto").message(
///             MessageDef::new("Node")
///                 .field(FieldDef::new("value", 1, "int32"))
///                 .field(FieldDef::new("children", 2, "Node").repeated()),
///         ),
///     )
///     .build()
///     .unwrap();
///
/// assert!(schema.message_by_name("Node").is_some());
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    files: Vec<FileDef>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: FileDef) -> &mut Self {
        self.files.push(file);
        self
    }

    pub fn with_file(mut self, file: FileDef) -> Self {
        self.files.push(file);
        self
    }

    /// Resolve and validate every added file
    pub fn build(self) -> SchemaResult<Schema> {
        let mut decls = Declarations::new(&self.files);
        for (index, file) in self.files.iter().enumerate() {
            decls.declare_file(FileId(index), file)?;
        }
        let resolved = decls.resolve()?;
        let schema = decls.validate(resolved)?;
        tracing::info!(
            "Resolved {} files: {} messages, {} enums",
            schema.files().len(),
            schema.message_count(),
            schema.enum_count()
        );
        Ok(schema)
    }
}

struct PendingMessage<'a> {
    def: &'a MessageDef,
    full_name: String,
    local_path: String,
    file: FileId,
    parent: Option<MessageId>,
    messages: Vec<MessageId>,
    enums: Vec<EnumId>,
}

struct PendingEnum<'a> {
    def: &'a EnumDef,
    full_name: String,
    local_path: String,
    file: FileId,
    parent: Option<MessageId>,
}

struct Declarations<'a> {
    defs: &'a [FileDef],
    files: Vec<SchemaFile>,
    messages: Vec<PendingMessage<'a>>,
    enums: Vec<PendingEnum<'a>>,
    index: HashMap<String, TypeId>,
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

impl<'a> Declarations<'a> {
    fn new(defs: &'a [FileDef]) -> Self {
        Self {
            defs,
            files: Vec::with_capacity(defs.len()),
            messages: Vec::new(),
            enums: Vec::new(),
            index: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Declare
    // ------------------------------------------------------------------

    fn declare_file(&mut self, id: FileId, file: &'a FileDef) -> SchemaResult<()> {
        if self.files.iter().any(|f| f.path == file.path) {
            return Err(SchemaError::DuplicateName {
                location: Location::message(&file.path, ""),
                scope: "schema set".to_string(),
                name: file.path.clone(),
            });
        }

        let package = file.package.clone().unwrap_or_default();
        let mut schema_file = SchemaFile {
            path: file.path.clone(),
            package: file.package.clone(),
            syntax: file.syntax,
            imports: file.imports.clone(),
            messages: Vec::with_capacity(file.messages.len()),
            enums: Vec::with_capacity(file.enums.len()),
        };

        for def in &file.enums {
            let enum_id = self.declare_enum(id, &package, "", None, def)?;
            schema_file.enums.push(enum_id);
        }
        for def in &file.messages {
            let message_id = self.declare_message(id, &package, "", None, def)?;
            schema_file.messages.push(message_id);
        }

        self.files.push(schema_file);
        Ok(())
    }

    fn declare_message(
        &mut self,
        file: FileId,
        scope: &str,
        local_scope: &str,
        parent: Option<MessageId>,
        def: &'a MessageDef,
    ) -> SchemaResult<MessageId> {
        let full_name = qualify(scope, &def.name);
        let local_path = qualify(local_scope, &def.name);
        let id = MessageId(self.messages.len());
        self.insert_name(file, scope, &local_path, &def.name, &full_name, TypeId::Message(id))?;
        tracing::debug!("Declared message {}", full_name);

        self.messages.push(PendingMessage {
            def,
            full_name: full_name.clone(),
            local_path: local_path.clone(),
            file,
            parent,
            messages: Vec::new(),
            enums: Vec::new(),
        });

        for nested in &def.enums {
            let enum_id = self.declare_enum(file, &full_name, &local_path, Some(id), nested)?;
            self.messages[id.0].enums.push(enum_id);
        }
        for nested in &def.messages {
            let message_id =
                self.declare_message(file, &full_name, &local_path, Some(id), nested)?;
            self.messages[id.0].messages.push(message_id);
        }

        Ok(id)
    }

    fn declare_enum(
        &mut self,
        file: FileId,
        scope: &str,
        local_scope: &str,
        parent: Option<MessageId>,
        def: &'a EnumDef,
    ) -> SchemaResult<EnumId> {
        let full_name = qualify(scope, &def.name);
        let local_path = qualify(local_scope, &def.name);
        let id = EnumId(self.enums.len());
        self.insert_name(file, scope, &local_path, &def.name, &full_name, TypeId::Enum(id))?;
        tracing::debug!("Declared enum {}", full_name);

        self.enums.push(PendingEnum {
            def,
            full_name,
            local_path,
            file,
            parent,
        });
        Ok(id)
    }

    fn insert_name(
        &mut self,
        file: FileId,
        scope: &str,
        local_path: &str,
        name: &str,
        full_name: &str,
        id: TypeId,
    ) -> SchemaResult<()> {
        if self.index.contains_key(full_name) {
            let scope = if scope.is_empty() {
                "<root>".to_string()
            } else {
                scope.to_string()
            };
            return Err(SchemaError::DuplicateName {
                location: Location::message(&self.defs[file.0].path, local_path),
                scope,
                name: name.to_string(),
            });
        }
        self.index.insert(full_name.to_string(), id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Resolve
    // ------------------------------------------------------------------

    fn resolve(&self) -> SchemaResult<Vec<Vec<FieldType>>> {
        let mut resolved = Vec::with_capacity(self.messages.len());
        for pending in &self.messages {
            let path = &self.defs[pending.file.0].path;
            let mut types = Vec::with_capacity(pending.def.fields.len());
            for field in &pending.def.fields {
                let unresolved = |type_name: &str| SchemaError::UnresolvedTypeReference {
                    location: Location::field(path, &pending.local_path, &field.name),
                    type_name: type_name.to_string(),
                };

                let ty = match &field.ty {
                    TypeDef::Named(name) => self
                        .resolve_name(name, &pending.full_name)
                        .ok_or_else(|| unresolved(name))?,
                    TypeDef::Map { key, value } => {
                        let key_type = self
                            .resolve_name(key, &pending.full_name)
                            .ok_or_else(|| unresolved(key))?;
                        let value_type = self
                            .resolve_name(value, &pending.full_name)
                            .ok_or_else(|| unresolved(value))?;
                        FieldType::Map(Box::new(MapType {
                            key: key_type,
                            value: value_type,
                        }))
                    }
                };
                types.push(ty);
            }
            resolved.push(types);
        }
        Ok(resolved)
    }

    /// Resolve a type name from within `scope` (the referencing message's full name)
    ///
    /// Candidates are tried from the innermost scope outward; a leading `.`
    /// makes the name fully qualified.
    fn resolve_name(&self, name: &str, scope: &str) -> Option<FieldType> {
        if let Some(kind) = ScalarKind::from_keyword(name) {
            return Some(FieldType::Scalar(kind));
        }
        if let Some(absolute) = name.strip_prefix('.') {
            return self.lookup_exact(absolute);
        }

        let mut scope = scope;
        loop {
            if let Some(found) = self.lookup_exact(&qualify(scope, name)) {
                return Some(found);
            }
            if scope.is_empty() {
                return None;
            }
            scope = match scope.rfind('.') {
                Some(dot) => &scope[..dot],
                None => "",
            };
        }
    }

    fn lookup_exact(&self, full_name: &str) -> Option<FieldType> {
        if let Some(wkt) = WellKnownType::from_full_name(full_name) {
            return Some(FieldType::WellKnown(wkt));
        }
        self.index.get(full_name).map(|id| match *id {
            TypeId::Message(id) => FieldType::Message(id),
            TypeId::Enum(id) => FieldType::Enum(id),
        })
    }

    // ------------------------------------------------------------------
    // Validate
    // ------------------------------------------------------------------

    fn validate(self, resolved: Vec<Vec<FieldType>>) -> SchemaResult<Schema> {
        let mut messages = Vec::with_capacity(self.messages.len());
        for (pending, types) in self.messages.iter().zip(resolved) {
            messages.push(self.validate_message(pending, types)?);
        }

        let mut enums = Vec::with_capacity(self.enums.len());
        for pending in &self.enums {
            enums.push(self.validate_enum(pending)?);
        }

        Ok(Schema {
            files: self.files,
            messages,
            enums,
            index: self.index,
        })
    }

    fn validate_message(
        &self,
        pending: &PendingMessage<'a>,
        types: Vec<FieldType>,
    ) -> SchemaResult<Message> {
        let def = pending.def;
        let file = &self.defs[pending.file.0];
        let location = |field: &str| Location::field(&file.path, &pending.local_path, field);

        let mut oneofs: Vec<Oneof> = Vec::with_capacity(def.oneofs.len());
        for oneof in &def.oneofs {
            let clashes = oneofs.iter().any(|o| o.name == oneof.name)
                || def.fields.iter().any(|f| f.name == oneof.name);
            if clashes {
                return Err(SchemaError::DuplicateName {
                    location: location(&oneof.name),
                    scope: pending.full_name.clone(),
                    name: oneof.name.clone(),
                });
            }
            oneofs.push(Oneof {
                name: oneof.name.clone(),
                fields: Vec::new(),
                docs: oneof.docs.clone(),
            });
        }

        let mut by_number: HashMap<u32, &str> = HashMap::new();
        let mut names: HashSet<&str> = HashSet::new();
        let mut fields = Vec::with_capacity(def.fields.len());

        for (index, (field, ty)) in def.fields.iter().zip(types).enumerate() {
            let here = location(&field.name);

            if field.number < 1 || field.number > MAX_FIELD_NUMBER {
                return Err(SchemaError::InvalidFieldNumber {
                    location: here,
                    number: field.number,
                });
            }
            let number = u32::try_from(field.number).map_err(|_| {
                SchemaError::InvalidFieldNumber {
                    location: here.clone(),
                    number: field.number,
                }
            })?;
            if IMPLEMENTATION_RESERVED.contains(&field.number) {
                return Err(SchemaError::ReservedFieldUse {
                    location: here,
                    reason: format!(
                        "field number {number} is reserved for the protobuf implementation"
                    ),
                });
            }

            if let Some(existing) = by_number.insert(number, &field.name) {
                return Err(SchemaError::DuplicateFieldNumber {
                    location: here,
                    number,
                    existing: existing.to_string(),
                });
            }
            if !names.insert(&field.name) {
                return Err(SchemaError::DuplicateName {
                    location: here,
                    scope: pending.full_name.clone(),
                    name: field.name.clone(),
                });
            }

            if def.reserved.contains_number(field.number) {
                return Err(SchemaError::ReservedFieldUse {
                    location: here,
                    reason: format!("field number {number} is reserved"),
                });
            }
            if def.reserved.contains_name(&field.name) {
                return Err(SchemaError::ReservedFieldUse {
                    location: here,
                    reason: format!("field name `{}` is reserved", field.name),
                });
            }

            if let FieldType::Map(map) = &ty {
                match field.label {
                    Label::Singular => {}
                    Label::Repeated => {
                        return Err(SchemaError::InvalidNesting {
                            location: here,
                            reason: "map fields cannot be repeated".to_string(),
                        });
                    }
                    Label::Optional | Label::Required => {
                        return Err(SchemaError::InvalidNesting {
                            location: here,
                            reason: "map fields cannot carry a label".to_string(),
                        });
                    }
                }
                if !is_valid_map_key(&map.key) {
                    let key_type = match &field.ty {
                        TypeDef::Map { key, .. } => key.clone(),
                        TypeDef::Named(name) => name.clone(),
                    };
                    return Err(SchemaError::InvalidMapKeyType {
                        location: here,
                        key_type,
                    });
                }
            }

            let oneof = match &field.oneof {
                None => None,
                Some(oneof_name) => {
                    let invalid = |reason: &str| SchemaError::InvalidOneofMember {
                        location: here.clone(),
                        oneof: oneof_name.clone(),
                        reason: reason.to_string(),
                    };
                    let Some(oneof_index) = oneofs.iter().position(|o| &o.name == oneof_name)
                    else {
                        return Err(invalid("message declares no such oneof"));
                    };
                    if ty_is_map(&ty) {
                        return Err(invalid("map fields cannot be oneof members"));
                    }
                    match field.label {
                        Label::Singular => {}
                        Label::Repeated => {
                            return Err(invalid("repeated fields cannot be oneof members"));
                        }
                        Label::Optional | Label::Required => {
                            return Err(invalid("oneof members cannot carry a label"));
                        }
                    }
                    oneofs[oneof_index].fields.push(index);
                    Some(oneof_index)
                }
            };

            let explicit_presence = match field.label {
                Label::Optional | Label::Required => true,
                Label::Repeated => false,
                Label::Singular => {
                    !ty_is_map(&ty)
                        && (oneof.is_some()
                            || file.syntax != Syntax::Proto3
                            || matches!(ty, FieldType::Message(_) | FieldType::WellKnown(_)))
                }
            };

            fields.push(Field {
                name: field.name.clone(),
                number,
                label: field.label,
                ty,
                oneof,
                explicit_presence,
                docs: field.docs.clone(),
            });
        }

        if let Some(empty) = oneofs.iter().find(|o| o.fields.is_empty()) {
            return Err(SchemaError::InvalidOneofMember {
                location: location(&empty.name),
                oneof: empty.name.clone(),
                reason: "oneof declares no fields".to_string(),
            });
        }

        let reserved_ranges = def
            .reserved
            .ranges
            .iter()
            .map(|&(start, end)| (clamp_field_number(start), clamp_field_number(end)))
            .collect();

        Ok(Message {
            name: def.name.clone(),
            full_name: pending.full_name.clone(),
            local_path: pending.local_path.clone(),
            file: pending.file,
            parent: pending.parent,
            fields,
            oneofs,
            messages: pending.messages.clone(),
            enums: pending.enums.clone(),
            reserved_ranges,
            reserved_names: def.reserved.names.clone(),
            docs: def.docs.clone(),
        })
    }

    fn validate_enum(&self, pending: &PendingEnum<'a>) -> SchemaResult<Enum> {
        let path = &self.defs[pending.file.0].path;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut values = Vec::with_capacity(pending.def.values.len());

        for value in &pending.def.values {
            let here = Location::field(path, &pending.local_path, &value.name);
            if !seen.insert(&value.name) {
                return Err(SchemaError::DuplicateName {
                    location: here,
                    scope: pending.full_name.clone(),
                    name: value.name.clone(),
                });
            }
            let number =
                i32::try_from(value.number).map_err(|_| SchemaError::InvalidEnumValue {
                    location: here,
                    number: value.number,
                })?;
            values.push(EnumValue {
                name: value.name.clone(),
                number,
                docs: value.docs.clone(),
            });
        }

        Ok(Enum {
            name: pending.def.name.clone(),
            full_name: pending.full_name.clone(),
            local_path: pending.local_path.clone(),
            file: pending.file,
            parent: pending.parent,
            values,
            docs: pending.def.docs.clone(),
        })
    }
}

fn is_valid_map_key(key: &FieldType) -> bool {
    match key {
        FieldType::Scalar(kind) => kind.is_valid_map_key(),
        FieldType::Enum(_) => true,
        _ => false,
    }
}

fn ty_is_map(ty: &FieldType) -> bool {
    matches!(ty, FieldType::Map(_))
}

fn clamp_field_number(number: i64) -> u32 {
    u32::try_from(number.clamp(0, MAX_FIELD_NUMBER)).unwrap_or(0)
}

#[cfg(test)]
#[path = "builder/builder_tests.rs"]
mod builder_tests;
