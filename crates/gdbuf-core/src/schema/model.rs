use super::types::{Label, ScalarKind, Syntax, WellKnownType};
use std::collections::HashMap;

/// Index of a message in the schema arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub(crate) usize);

impl MessageId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Index of an enum in the schema arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub(crate) usize);

impl EnumId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Index of a schema file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub(crate) usize);

impl FileId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Any named type declared in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    Message(MessageId),
    Enum(EnumId),
}

/// Resolved field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarKind),
    Enum(EnumId),
    Message(MessageId),
    WellKnown(WellKnownType),
    Map(Box<MapType>),
}

/// Key and value types of a map field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapType {
    pub key: FieldType,
    pub value: FieldType,
}

/// A validated, fully resolved set of schema files
///
/// Messages and enums live in flat arenas addressed by [`MessageId`] and
/// [`EnumId`]; nesting is recorded through parent/child ids, and field
/// references to other messages (including recursive ones) are ids, never
/// copies.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub(crate) files: Vec<SchemaFile>,
    pub(crate) messages: Vec<Message>,
    pub(crate) enums: Vec<Enum>,
    pub(crate) index: HashMap<String, TypeId>,
}

impl Schema {
    pub fn files(&self) -> &[SchemaFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> &SchemaFile {
        &self.files[id.0]
    }

    pub fn message(&self, id: MessageId) -> &Message {
        &self.messages[id.0]
    }

    pub fn enum_type(&self, id: EnumId) -> &Enum {
        &self.enums[id.0]
    }

    /// All messages in declaration order (file by file, parents before children)
    pub fn messages(&self) -> impl Iterator<Item = (MessageId, &Message)> {
        self.messages
            .iter()
            .enumerate()
            .map(|(i, m)| (MessageId(i), m))
    }

    pub fn enums(&self) -> impl Iterator<Item = (EnumId, &Enum)> {
        self.enums.iter().enumerate().map(|(i, e)| (EnumId(i), e))
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    /// Look up a type by fully-qualified name; a leading `.` is accepted
    pub fn lookup(&self, full_name: &str) -> Option<TypeId> {
        let name = full_name.strip_prefix('.').unwrap_or(full_name);
        self.index.get(name).copied()
    }

    pub fn message_by_name(&self, full_name: &str) -> Option<MessageId> {
        match self.lookup(full_name)? {
            TypeId::Message(id) => Some(id),
            TypeId::Enum(_) => None,
        }
    }

    pub fn enum_by_name(&self, full_name: &str) -> Option<EnumId> {
        match self.lookup(full_name)? {
            TypeId::Enum(id) => Some(id),
            TypeId::Message(_) => None,
        }
    }

    /// Human-readable name of a resolved type, as used in diagnostics
    pub fn type_name(&self, ty: &FieldType) -> String {
        match ty {
            FieldType::Scalar(kind) => kind.keyword().to_string(),
            FieldType::Enum(id) => self.enum_type(*id).full_name.clone(),
            FieldType::Message(id) => self.message(*id).full_name.clone(),
            FieldType::WellKnown(wkt) => wkt.full_name(),
            FieldType::Map(map) => format!(
                "map<{}, {}>",
                self.type_name(&map.key),
                self.type_name(&map.value)
            ),
        }
    }
}

/// One schema file after resolution
#[derive(Debug, Clone)]
pub struct SchemaFile {
    pub path: String,
    pub package: Option<String>,
    pub syntax: Syntax,
    pub imports: Vec<String>,
    /// Top-level messages only
    pub messages: Vec<MessageId>,
    /// Top-level enums only
    pub enums: Vec<EnumId>,
}

impl SchemaFile {
    /// File name without directories or extension (`nested/deeply/nested.proto` → `nested`)
    pub fn stem(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        name.strip_suffix(".proto").unwrap_or(name)
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    /// `package.Outer.Inner`
    pub full_name: String,
    /// Path within the file, `Outer.Inner`
    pub local_path: String,
    pub file: FileId,
    pub parent: Option<MessageId>,
    pub fields: Vec<Field>,
    pub oneofs: Vec<Oneof>,
    pub messages: Vec<MessageId>,
    pub enums: Vec<EnumId>,
    pub reserved_ranges: Vec<(u32, u32)>,
    pub reserved_names: Vec<String>,
    pub docs: Option<String>,
}

impl Message {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields belonging to the oneof at `index`
    pub fn oneof_fields(&self, index: usize) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(move |f| f.oneof == Some(index))
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub number: u32,
    pub label: Label,
    pub ty: FieldType,
    /// Index into the owning message's `oneofs`
    pub oneof: Option<usize>,
    pub explicit_presence: bool,
    pub docs: Option<String>,
}

impl Field {
    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    pub fn is_map(&self) -> bool {
        matches!(self.ty, FieldType::Map(_))
    }

    pub fn has_presence(&self) -> bool {
        self.explicit_presence
    }
}

#[derive(Debug, Clone)]
pub struct Oneof {
    pub name: String,
    /// Indices into the owning message's `fields`
    pub fields: Vec<usize>,
    pub docs: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    pub full_name: String,
    pub local_path: String,
    pub file: FileId,
    pub parent: Option<MessageId>,
    pub values: Vec<EnumValue>,
    pub docs: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
    pub docs: Option<String>,
}
