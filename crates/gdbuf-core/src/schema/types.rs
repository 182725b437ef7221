//! Primitive schema vocabulary: scalar kinds, labels, well-known types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest field number the wire format allows
pub const MAX_FIELD_NUMBER: i64 = 536_870_911;

/// Protobuf scalar value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarKind {
    /// Every scalar kind, in declaration order
    pub const ALL: [ScalarKind; 15] = [
        ScalarKind::Double,
        ScalarKind::Float,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::Uint32,
        ScalarKind::Uint64,
        ScalarKind::Sint32,
        ScalarKind::Sint64,
        ScalarKind::Fixed32,
        ScalarKind::Fixed64,
        ScalarKind::Sfixed32,
        ScalarKind::Sfixed64,
        ScalarKind::Bool,
        ScalarKind::String,
        ScalarKind::Bytes,
    ];

    /// Look up a scalar by its schema keyword (`int32`, `bytes`, ...)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// The schema keyword for this scalar
    pub fn keyword(&self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Sint64 => "sint64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Sfixed64 => "sfixed64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
        }
    }

    /// Map keys may be any integral scalar, bool or string
    pub fn is_valid_map_key(&self) -> bool {
        !matches!(
            self,
            ScalarKind::Double | ScalarKind::Float | ScalarKind::Bytes
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Well-known types under `google.protobuf` that get a native host mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WellKnownType {
    Any,
    Timestamp,
    Duration,
    Struct,
    Value,
    ListValue,
    Empty,
    FieldMask,
    DoubleValue,
    FloatValue,
    Int64Value,
    UInt64Value,
    Int32Value,
    UInt32Value,
    BoolValue,
    StringValue,
    BytesValue,
}

const WELL_KNOWN_PACKAGE: &str = "google.protobuf.";

impl WellKnownType {
    pub const ALL: [WellKnownType; 17] = [
        WellKnownType::Any,
        WellKnownType::Timestamp,
        WellKnownType::Duration,
        WellKnownType::Struct,
        WellKnownType::Value,
        WellKnownType::ListValue,
        WellKnownType::Empty,
        WellKnownType::FieldMask,
        WellKnownType::DoubleValue,
        WellKnownType::FloatValue,
        WellKnownType::Int64Value,
        WellKnownType::UInt64Value,
        WellKnownType::Int32Value,
        WellKnownType::UInt32Value,
        WellKnownType::BoolValue,
        WellKnownType::StringValue,
        WellKnownType::BytesValue,
    ];

    /// Recognize a fully-qualified name such as `google.protobuf.Timestamp`
    ///
    /// A single leading `.` is accepted.
    pub fn from_full_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('.').unwrap_or(name);
        let short = name.strip_prefix(WELL_KNOWN_PACKAGE)?;
        Self::ALL.into_iter().find(|wkt| wkt.name() == short)
    }

    /// Short type name, e.g. `Timestamp`
    pub fn name(&self) -> &'static str {
        match self {
            WellKnownType::Any => "Any",
            WellKnownType::Timestamp => "Timestamp",
            WellKnownType::Duration => "Duration",
            WellKnownType::Struct => "Struct",
            WellKnownType::Value => "Value",
            WellKnownType::ListValue => "ListValue",
            WellKnownType::Empty => "Empty",
            WellKnownType::FieldMask => "FieldMask",
            WellKnownType::DoubleValue => "DoubleValue",
            WellKnownType::FloatValue => "FloatValue",
            WellKnownType::Int64Value => "Int64Value",
            WellKnownType::UInt64Value => "UInt64Value",
            WellKnownType::Int32Value => "Int32Value",
            WellKnownType::UInt32Value => "UInt32Value",
            WellKnownType::BoolValue => "BoolValue",
            WellKnownType::StringValue => "StringValue",
            WellKnownType::BytesValue => "BytesValue",
        }
    }

    /// Fully-qualified name, e.g. `google.protobuf.Timestamp`
    pub fn full_name(&self) -> String {
        format!("{WELL_KNOWN_PACKAGE}{}", self.name())
    }

    /// The scalar carried by a wrapper type (`Int32Value` → `int32`)
    pub fn wrapped_scalar(&self) -> Option<ScalarKind> {
        match self {
            WellKnownType::DoubleValue => Some(ScalarKind::Double),
            WellKnownType::FloatValue => Some(ScalarKind::Float),
            WellKnownType::Int64Value => Some(ScalarKind::Int64),
            WellKnownType::UInt64Value => Some(ScalarKind::Uint64),
            WellKnownType::Int32Value => Some(ScalarKind::Int32),
            WellKnownType::UInt32Value => Some(ScalarKind::Uint32),
            WellKnownType::BoolValue => Some(ScalarKind::Bool),
            WellKnownType::StringValue => Some(ScalarKind::String),
            WellKnownType::BytesValue => Some(ScalarKind::Bytes),
            _ => None,
        }
    }
}

impl fmt::Display for WellKnownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{WELL_KNOWN_PACKAGE}{}", self.name())
    }
}

/// Field cardinality as written in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// No label (proto3 implicit presence, or proto2 without label inside a oneof)
    #[default]
    Singular,
    Optional,
    Required,
    Repeated,
}

impl Label {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "optional" => Some(Label::Optional),
            "required" => Some(Label::Required),
            "repeated" => Some(Label::Repeated),
            _ => None,
        }
    }
}

/// Schema language revision declared by a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Syntax {
    Proto2,
    #[default]
    Proto3,
    Editions,
}

impl Syntax {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "proto2" => Some(Syntax::Proto2),
            "proto3" => Some(Syntax::Proto3),
            "editions" => Some(Syntax::Editions),
            _ => None,
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Syntax::Proto2 => write!(f, "proto2"),
            Syntax::Proto3 => write!(f, "proto3"),
            Syntax::Editions => write!(f, "editions"),
        }
    }
}
