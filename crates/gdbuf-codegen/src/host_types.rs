//! Host type mappings for generated bindings.
//!
//! Every mapped field type has a C++ representation and a host variant type
//! used when the property is advertised to the class database.
//!
//! # Type Mappings
//!
//! | Schema | C++ | Variant |
//! |--------|-----|---------|
//! | `string` | `godot::String` | `STRING` |
//! | `bool` | `bool` | `BOOL` |
//! | `int32`, `sint32`, `sfixed32` | `int32_t` | `INT` |
//! | `int64`, `sint64`, `sfixed64` | `int64_t` | `INT` |
//! | `uint32`, `fixed32` | `uint32_t` | `INT` |
//! | `uint64`, `fixed64` | `uint64_t` | `INT` |
//! | `float` / `double` | `float` / `double` | `FLOAT` |
//! | `bytes` | `godot::PackedByteArray` | `PACKED_BYTE_ARRAY` |
//! | enum | `int32_t` | `INT` |
//! | message | `godot::Ref<ns::Class>` | `OBJECT` |
//! | `repeated T` | `godot::Array` | `ARRAY` |
//! | `map<K, V>` | `godot::Dictionary` | `DICTIONARY` |
//! | `Timestamp` | `int64_t` (Unix milliseconds) | `INT` |
//! | `Duration` | `double` (seconds) | `FLOAT` |
//! | `Struct`, `Any` | `godot::Dictionary` | `DICTIONARY` |
//! | `ListValue` | `godot::Array` | `ARRAY` |
//! | `Value`, `Empty` | `godot::Variant` | `NIL` |
//! | `FieldMask` | `godot::PackedStringArray` | `PACKED_STRING_ARRAY` |
//! | wrappers (`Int32Value`, ...) | the wrapped scalar | the wrapped scalar |

use crate::ir::ClassIndex;
use crate::mapper::MappedType;
use gdbuf_core::{ScalarKind, WellKnownType};
use std::fmt;

/// Host variant type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantType {
    Nil,
    Bool,
    Int,
    Float,
    String,
    Object,
    Dictionary,
    Array,
    PackedByteArray,
    PackedStringArray,
}

impl VariantType {
    /// The `godot::Variant::Type` constant
    pub fn cpp_enum(&self) -> &'static str {
        match self {
            VariantType::Nil => "godot::Variant::NIL",
            VariantType::Bool => "godot::Variant::BOOL",
            VariantType::Int => "godot::Variant::INT",
            VariantType::Float => "godot::Variant::FLOAT",
            VariantType::String => "godot::Variant::STRING",
            VariantType::Object => "godot::Variant::OBJECT",
            VariantType::Dictionary => "godot::Variant::DICTIONARY",
            VariantType::Array => "godot::Variant::ARRAY",
            VariantType::PackedByteArray => "godot::Variant::PACKED_BYTE_ARRAY",
            VariantType::PackedStringArray => "godot::Variant::PACKED_STRING_ARRAY",
        }
    }

    /// Type name as written in class reference docs
    pub fn doc_name(&self) -> &'static str {
        match self {
            VariantType::Nil => "Variant",
            VariantType::Bool => "bool",
            VariantType::Int => "int",
            VariantType::Float => "float",
            VariantType::String => "String",
            VariantType::Object => "Object",
            VariantType::Dictionary => "Dictionary",
            VariantType::Array => "Array",
            VariantType::PackedByteArray => "PackedByteArray",
            VariantType::PackedStringArray => "PackedStringArray",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.doc_name())
    }
}

/// Editor hint attached to a bound property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyHint {
    /// `NAME:value` pairs of an enum
    Enum(String),
    /// Element type of a typed array
    ArrayType(String),
}

impl PropertyHint {
    pub fn cpp_constant(&self) -> &'static str {
        match self {
            PropertyHint::Enum(_) => "godot::PROPERTY_HINT_ENUM",
            PropertyHint::ArrayType(_) => "godot::PROPERTY_HINT_ARRAY_TYPE",
        }
    }

    pub fn hint_string(&self) -> &str {
        match self {
            PropertyHint::Enum(s) | PropertyHint::ArrayType(s) => s,
        }
    }
}

/// A type as the host sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostType {
    /// C++ spelling, e.g. `int32_t` or `godot::Ref<gdbuf::game::Player>`
    pub cpp: String,
    pub variant: VariantType,
    /// Host class for object types
    pub class_name: Option<String>,
    pub hint: Option<PropertyHint>,
}

impl HostType {
    pub fn new(cpp: &str, variant: VariantType) -> Self {
        Self {
            cpp: cpp.to_string(),
            variant,
            class_name: None,
            hint: None,
        }
    }

    /// Reference-counted handle to a generated (or host) class
    pub fn object(qualified_cpp: &str, class_name: &str) -> Self {
        Self {
            cpp: format!("godot::Ref<{qualified_cpp}>"),
            variant: VariantType::Object,
            class_name: Some(class_name.to_string()),
            hint: None,
        }
    }

    /// Untyped reference-counted object, used by `Any` packing
    pub fn ref_counted() -> Self {
        Self::object("godot::RefCounted", "RefCounted")
    }

    pub fn int64() -> Self {
        Self::new("int64_t", VariantType::Int)
    }

    pub fn boolean() -> Self {
        Self::new("bool", VariantType::Bool)
    }

    pub fn string() -> Self {
        Self::new("godot::String", VariantType::String)
    }

    fn with_hint(mut self, hint: PropertyHint) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Whether C++ passes the type by value rather than const reference
    pub fn is_by_value(&self) -> bool {
        matches!(
            self.variant,
            VariantType::Bool | VariantType::Int | VariantType::Float
        )
    }

    /// C++ parameter declaration, e.g. `const godot::String &p_value`
    pub fn param_decl(&self, name: &str) -> String {
        if self.is_by_value() {
            format!("{} p_{name}", self.cpp)
        } else {
            format!("const {} &p_{name}", self.cpp)
        }
    }

    /// Type name as written in class reference docs
    pub fn doc_type(&self) -> &str {
        self.class_name
            .as_deref()
            .unwrap_or_else(|| self.variant.doc_name())
    }
}

/// Host type for a scalar
pub fn scalar_host_type(kind: ScalarKind) -> HostType {
    match kind {
        ScalarKind::String => HostType::string(),
        ScalarKind::Bool => HostType::boolean(),
        ScalarKind::Int32 | ScalarKind::Sint32 | ScalarKind::Sfixed32 => {
            HostType::new("int32_t", VariantType::Int)
        }
        ScalarKind::Int64 | ScalarKind::Sint64 | ScalarKind::Sfixed64 => HostType::int64(),
        ScalarKind::Uint32 | ScalarKind::Fixed32 => HostType::new("uint32_t", VariantType::Int),
        ScalarKind::Uint64 | ScalarKind::Fixed64 => HostType::new("uint64_t", VariantType::Int),
        ScalarKind::Float => HostType::new("float", VariantType::Float),
        ScalarKind::Double => HostType::new("double", VariantType::Float),
        ScalarKind::Bytes => HostType::new("godot::PackedByteArray", VariantType::PackedByteArray),
    }
}

/// Host type for a well-known type
pub fn well_known_host_type(wkt: WellKnownType) -> HostType {
    if let Some(kind) = wkt.wrapped_scalar() {
        return scalar_host_type(kind);
    }
    match wkt {
        WellKnownType::Timestamp => HostType::int64(),
        WellKnownType::Duration => HostType::new("double", VariantType::Float),
        WellKnownType::Struct | WellKnownType::Any => {
            HostType::new("godot::Dictionary", VariantType::Dictionary)
        }
        WellKnownType::ListValue => HostType::new("godot::Array", VariantType::Array),
        WellKnownType::FieldMask => {
            HostType::new("godot::PackedStringArray", VariantType::PackedStringArray)
        }
        _ => HostType::new("godot::Variant", VariantType::Nil),
    }
}

/// Host type for any mapped field type
///
/// Message references resolve through `classes` to their generated class;
/// enum references pick up an enum hint listing their values.
pub fn host_type(mapped: &MappedType, classes: &ClassIndex) -> HostType {
    match mapped {
        MappedType::Scalar(kind) => scalar_host_type(*kind),
        MappedType::WellKnown(wkt) => well_known_host_type(*wkt),
        MappedType::EnumRef(name) => {
            let base = HostType::new("int32_t", VariantType::Int);
            match classes.enum_hint(name) {
                Some(hint) => base.with_hint(PropertyHint::Enum(hint.to_string())),
                None => base,
            }
        }
        MappedType::MessageRef(name) => match classes.get(name) {
            Some(class) => HostType::object(&class.qualified(), &class.name),
            None => HostType::ref_counted(),
        },
        MappedType::Repeated(inner) => {
            let element = host_type(inner, classes);
            HostType::new("godot::Array", VariantType::Array)
                .with_hint(PropertyHint::ArrayType(element.doc_type().to_string()))
        }
        MappedType::Map(..) => HostType::new("godot::Dictionary", VariantType::Dictionary),
    }
}

/// Doc note appended to fields whose well-known type changes representation
pub fn well_known_note(wkt: WellKnownType) -> Option<&'static str> {
    match wkt {
        WellKnownType::Timestamp => Some(
            "Note: This field is a Google Protobuf Timestamp. In Godot, it is represented as an int64 (Unix timestamp in milliseconds).",
        ),
        WellKnownType::Duration => Some(
            "Note: This field is a Google Protobuf Duration. In Godot, it is represented as a double (seconds).",
        ),
        WellKnownType::Struct => Some(
            "Note: This field is a Google Protobuf Struct. In Godot, it is represented as a Dictionary.",
        ),
        WellKnownType::Any => Some(
            "Note: This field is a Google Protobuf Any. Use the pack and unpack methods to store and retrieve a message.",
        ),
        WellKnownType::FieldMask => Some(
            "Note: This field is a Google Protobuf FieldMask. In Godot, it is represented as a PackedStringArray of paths.",
        ),
        _ => None,
    }
}
