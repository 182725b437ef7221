//! Unresolved schema definitions
//!
//! These mirror the source text (or descriptor) one-to-one: type references
//! are still plain names and nothing has been validated yet. Feed them to a
//! [`SchemaBuilder`](super::SchemaBuilder) to obtain a resolved [`Schema`](super::Schema).

use super::types::{Label, Syntax};

/// One schema file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDef {
    /// Path relative to the schema root, e.g. `nested/deeply/nested.proto`
    pub path: String,
    pub package: Option<String>,
    pub syntax: Syntax,
    pub imports: Vec<String>,
    pub messages: Vec<MessageDef>,
    pub enums: Vec<EnumDef>,
}

impl FileDef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn import(mut self, path: impl Into<String>) -> Self {
        self.imports.push(path.into());
        self
    }

    pub fn message(mut self, message: MessageDef) -> Self {
        self.messages.push(message);
        self
    }

    pub fn enum_def(mut self, def: EnumDef) -> Self {
        self.enums.push(def);
        self
    }
}

/// Reserved field numbers and names of a message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservedDef {
    /// Inclusive ranges
    pub ranges: Vec<(i64, i64)>,
    pub names: Vec<String>,
}

impl ReservedDef {
    pub fn contains_number(&self, number: i64) -> bool {
        self.ranges
            .iter()
            .any(|&(start, end)| (start..=end).contains(&number))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.names.is_empty()
    }
}

/// A message declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub oneofs: Vec<OneofDef>,
    pub messages: Vec<MessageDef>,
    pub enums: Vec<EnumDef>,
    pub reserved: ReservedDef,
    pub docs: Option<String>,
}

impl MessageDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn oneof(mut self, name: impl Into<String>) -> Self {
        self.oneofs.push(OneofDef::new(name));
        self
    }

    pub fn nested(mut self, message: MessageDef) -> Self {
        self.messages.push(message);
        self
    }

    pub fn nested_enum(mut self, def: EnumDef) -> Self {
        self.enums.push(def);
        self
    }

    pub fn reserve_range(mut self, start: i64, end: i64) -> Self {
        self.reserved.ranges.push((start, end));
        self
    }

    pub fn reserve_name(mut self, name: impl Into<String>) -> Self {
        self.reserved.names.push(name.into());
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

/// Field type as written in the source
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    /// Scalar keyword or (possibly qualified) type name
    Named(String),
    /// `map<key, value>`
    Map { key: String, value: String },
}

impl TypeDef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeDef::Named(name.into())
    }
}

/// A field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    /// Kept wide so out-of-range numbers survive until validation
    pub number: i64,
    pub label: Label,
    pub ty: TypeDef,
    /// Name of the containing oneof
    pub oneof: Option<String>,
    pub docs: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, number: i64, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            label: Label::Singular,
            ty: TypeDef::Named(ty.into()),
            oneof: None,
            docs: None,
        }
    }

    pub fn map(
        name: impl Into<String>,
        number: i64,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            number,
            label: Label::Singular,
            ty: TypeDef::Map {
                key: key.into(),
                value: value.into(),
            },
            oneof: None,
            docs: None,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = label;
        self
    }

    pub fn repeated(self) -> Self {
        self.with_label(Label::Repeated)
    }

    pub fn optional(self) -> Self {
        self.with_label(Label::Optional)
    }

    pub fn in_oneof(mut self, oneof: impl Into<String>) -> Self {
        self.oneof = Some(oneof.into());
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneofDef {
    pub name: String,
    pub docs: Option<String>,
}

impl OneofDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: None,
        }
    }
}

/// An enum declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<EnumValueDef>,
    pub docs: Option<String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn value(mut self, name: impl Into<String>, number: i64) -> Self {
        self.values.push(EnumValueDef {
            name: name.into(),
            number,
            docs: None,
        });
        self
    }

    pub fn with_docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDef {
    pub name: String,
    pub number: i64,
    pub docs: Option<String>,
}
