//! Schema ingestion from binary `FileDescriptorSet`s
//!
//! Accepts the output of `protoc --descriptor_set_out` (optionally with
//! `--include_source_info` for doc comments). Descriptor conventions are
//! folded back into source form: map-entry messages become `map<K, V>`
//! fields and proto3 `optional` synthetic oneofs become `optional` labels.

use gdbuf_core::prelude::*;
use gdbuf_core::Syntax;
use gdbuf_core::schema::def::{EnumValueDef, ReservedDef};
use prost::Message as _;
use prost_types::field_descriptor_proto::{Label as DescriptorLabel, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet,
};
use std::collections::{HashMap, HashSet};

// Field numbers within descriptor.proto, used by source code info paths
const FILE_MESSAGE_TYPE: i32 = 4;
const FILE_ENUM_TYPE: i32 = 5;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED_TYPE: i32 = 3;
const MESSAGE_ENUM_TYPE: i32 = 4;
const MESSAGE_ONEOF_DECL: i32 = 8;
const ENUM_VALUE: i32 = 2;

/// Decode an encoded `FileDescriptorSet`
///
/// `source` names the descriptor file in diagnostics.
pub fn decode_descriptor_set(source: &str, bytes: &[u8]) -> SchemaResult<Vec<FileDef>> {
    let set = FileDescriptorSet::decode(bytes).map_err(|e| SchemaError::InvalidDescriptor {
        file: source.to_string(),
        detail: e.to_string(),
    })?;
    from_descriptor_set(&set)
}

/// Convert every non-well-known file in the set
pub fn from_descriptor_set(set: &FileDescriptorSet) -> SchemaResult<Vec<FileDef>> {
    let mut files = Vec::with_capacity(set.file.len());
    for file in &set.file {
        if file.name().starts_with("google/protobuf/") {
            tracing::debug!("Skipping well-known descriptor {}", file.name());
            continue;
        }
        files.push(convert_file(file)?);
    }
    Ok(files)
}

fn convert_file(file: &FileDescriptorProto) -> SchemaResult<FileDef> {
    let path = file.name.clone().ok_or_else(|| SchemaError::InvalidDescriptor {
        file: "<descriptor set>".to_string(),
        detail: "file descriptor without a name".to_string(),
    })?;

    let syntax = match file.syntax() {
        "" | "proto2" => Syntax::Proto2,
        "proto3" => Syntax::Proto3,
        "editions" => Syntax::Editions,
        other => {
            return Err(SchemaError::InvalidDescriptor {
                file: path,
                detail: format!("unknown syntax `{other}`"),
            });
        }
    };

    let docs: HashMap<Vec<i32>, String> = file
        .source_code_info
        .iter()
        .flat_map(|info| &info.location)
        .filter_map(|location| {
            let text = location
                .leading_comments
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .or_else(|| {
                    location
                        .trailing_comments
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                })?;
            Some((location.path.clone(), text.to_string()))
        })
        .collect();

    let ctx = FileContext {
        path: &path,
        syntax,
        docs,
    };
    let scope = match file.package() {
        "" => String::new(),
        package => format!(".{package}"),
    };

    let mut def = FileDef::new(&path).with_syntax(syntax);
    if !file.package().is_empty() {
        def.package = Some(file.package().to_string());
    }
    def.imports = file.dependency.clone();

    for (index, message) in file.message_type.iter().enumerate() {
        let source_path = vec![FILE_MESSAGE_TYPE, index_i32(index)];
        def.messages
            .push(ctx.convert_message(message, &scope, source_path)?);
    }
    for (index, enum_type) in file.enum_type.iter().enumerate() {
        let source_path = vec![FILE_ENUM_TYPE, index_i32(index)];
        def.enums.push(ctx.convert_enum(enum_type, source_path));
    }

    tracing::debug!(
        "Read descriptor {}: {} messages, {} enums",
        path,
        def.messages.len(),
        def.enums.len()
    );
    Ok(def)
}

fn index_i32(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

fn child_path(parent: &[i32], kind: i32, index: usize) -> Vec<i32> {
    let mut path = parent.to_vec();
    path.push(kind);
    path.push(index_i32(index));
    path
}

struct FileContext<'a> {
    path: &'a str,
    syntax: Syntax,
    docs: HashMap<Vec<i32>, String>,
}

impl FileContext<'_> {
    fn invalid(&self, detail: impl Into<String>) -> SchemaError {
        SchemaError::InvalidDescriptor {
            file: self.path.to_string(),
            detail: detail.into(),
        }
    }

    fn docs(&self, path: &[i32]) -> Option<String> {
        self.docs.get(path).cloned()
    }

    /// `scope` is the parent's fully-qualified name with a leading `.`
    fn convert_message(
        &self,
        message: &DescriptorProto,
        scope: &str,
        source_path: Vec<i32>,
    ) -> SchemaResult<MessageDef> {
        let name = message
            .name
            .clone()
            .ok_or_else(|| self.invalid("message descriptor without a name"))?;
        let full_name = format!("{scope}.{name}");

        let mut def = MessageDef::new(&name);
        def.docs = self.docs(&source_path);

        // Map entries are synthesized nested types; index them by full name
        let mut map_entries: HashMap<String, &DescriptorProto> = HashMap::new();
        for (index, nested) in message.nested_type.iter().enumerate() {
            let is_map_entry = nested
                .options
                .as_ref()
                .is_some_and(|options| options.map_entry());
            if is_map_entry {
                map_entries.insert(format!("{full_name}.{}", nested.name()), nested);
            } else {
                let nested_path = child_path(&source_path, MESSAGE_NESTED_TYPE, index);
                def.messages
                    .push(self.convert_message(nested, &full_name, nested_path)?);
            }
        }

        for (index, enum_type) in message.enum_type.iter().enumerate() {
            let enum_path = child_path(&source_path, MESSAGE_ENUM_TYPE, index);
            def.enums.push(self.convert_enum(enum_type, enum_path));
        }

        let synthetic: HashSet<i32> = message
            .field
            .iter()
            .filter(|field| field.proto3_optional())
            .filter_map(|field| field.oneof_index)
            .collect();

        let mut oneof_names: HashMap<i32, String> = HashMap::new();
        for (position, oneof) in message.oneof_decl.iter().enumerate() {
            let index = index_i32(position);
            if synthetic.contains(&index) {
                continue;
            }
            let oneof_path = child_path(&source_path, MESSAGE_ONEOF_DECL, position);
            oneof_names.insert(index, oneof.name().to_string());
            def.oneofs.push(OneofDef {
                name: oneof.name().to_string(),
                docs: self.docs(&oneof_path),
            });
        }

        for (index, field) in message.field.iter().enumerate() {
            let field_path = child_path(&source_path, MESSAGE_FIELD, index);
            let mut converted = self.convert_field(field, &map_entries)?;
            converted.docs = self.docs(&field_path);
            if !field.proto3_optional() {
                converted.oneof = field
                    .oneof_index
                    .and_then(|index| oneof_names.get(&index).cloned());
                if converted.oneof.is_some() {
                    converted.label = Label::Singular;
                }
            }
            def.fields.push(converted);
        }

        def.reserved = ReservedDef {
            ranges: message
                .reserved_range
                .iter()
                .map(|range| (i64::from(range.start()), i64::from(range.end()) - 1))
                .collect(),
            names: message.reserved_name.clone(),
        };

        Ok(def)
    }

    fn convert_field(
        &self,
        field: &FieldDescriptorProto,
        map_entries: &HashMap<String, &DescriptorProto>,
    ) -> SchemaResult<FieldDef> {
        let name = field
            .name
            .clone()
            .ok_or_else(|| self.invalid("field descriptor without a name"))?;
        let number = field
            .number
            .ok_or_else(|| self.invalid(format!("field `{name}` has no number")))?;

        if field.label() == DescriptorLabel::Repeated {
            if let Some(entry) = map_entries.get(field.type_name()) {
                let (key, value) = self.map_entry_types(entry)?;
                return Ok(FieldDef::map(name, i64::from(number), key, value));
            }
        }

        let label = match field.label() {
            DescriptorLabel::Repeated => Label::Repeated,
            DescriptorLabel::Required => Label::Required,
            DescriptorLabel::Optional if field.proto3_optional() => Label::Optional,
            DescriptorLabel::Optional if self.syntax == Syntax::Proto2 => Label::Optional,
            DescriptorLabel::Optional => Label::Singular,
        };

        let type_name = self.type_name(field)?;
        Ok(FieldDef::new(name, i64::from(number), type_name).with_label(label))
    }

    fn map_entry_types(&self, entry: &DescriptorProto) -> SchemaResult<(String, String)> {
        let key = entry.field.iter().find(|f| f.number() == 1);
        let value = entry.field.iter().find(|f| f.number() == 2);
        match (key, value) {
            (Some(key), Some(value)) => Ok((self.type_name(key)?, self.type_name(value)?)),
            _ => Err(self.invalid(format!(
                "map entry `{}` lacks a key or value field",
                entry.name()
            ))),
        }
    }

    /// Scalar keyword, or the fully-qualified referenced name
    fn type_name(&self, field: &FieldDescriptorProto) -> SchemaResult<String> {
        let keyword = match field.r#type() {
            Type::Double => "double",
            Type::Float => "float",
            Type::Int64 => "int64",
            Type::Uint64 => "uint64",
            Type::Int32 => "int32",
            Type::Fixed64 => "fixed64",
            Type::Fixed32 => "fixed32",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Bytes => "bytes",
            Type::Uint32 => "uint32",
            Type::Sfixed32 => "sfixed32",
            Type::Sfixed64 => "sfixed64",
            Type::Sint32 => "sint32",
            Type::Sint64 => "sint64",
            Type::Message | Type::Enum => {
                if field.type_name().is_empty() {
                    return Err(self.invalid(format!(
                        "field `{}` references a type without naming it",
                        field.name()
                    )));
                }
                return Ok(field.type_name().to_string());
            }
            Type::Group => {
                return Err(self.invalid(format!(
                    "field `{}` is a group, which is not supported",
                    field.name()
                )));
            }
        };
        Ok(keyword.to_string())
    }

    fn convert_enum(&self, enum_type: &EnumDescriptorProto, source_path: Vec<i32>) -> EnumDef {
        let mut def = EnumDef::new(enum_type.name());
        def.docs = self.docs(&source_path);
        def.values = enum_type
            .value
            .iter()
            .enumerate()
            .map(|(index, value)| EnumValueDef {
                name: value.name().to_string(),
                number: i64::from(value.number()),
                docs: self.docs(&child_path(&source_path, ENUM_VALUE, index)),
            })
            .collect();
        def
    }
}
