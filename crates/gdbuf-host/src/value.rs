//! Dynamic host values passed through the accessor contract

use crate::object::ObjectRef;
use gdbuf_codegen::host_types::VariantType;
use std::collections::BTreeMap;
use std::fmt;

/// A value as the host's variant type system sees it
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    StringList(Vec<String>),
    Array(Vec<Value>),
    Dictionary(BTreeMap<MapKey, Value>),
    Object(ObjectRef),
}

impl Value {
    /// Zero value of a variant type; objects default to `Nil`
    pub fn default_for(variant: VariantType) -> Self {
        match variant {
            VariantType::Nil | VariantType::Object => Value::Nil,
            VariantType::Bool => Value::Bool(false),
            VariantType::Int => Value::Int(0),
            VariantType::Float => Value::Float(0.0),
            VariantType::String => Value::String(String::new()),
            VariantType::Dictionary => Value::Dictionary(BTreeMap::new()),
            VariantType::Array => Value::Array(Vec::new()),
            VariantType::PackedByteArray => Value::Bytes(Vec::new()),
            VariantType::PackedStringArray => Value::StringList(Vec::new()),
        }
    }

    pub fn variant_type(&self) -> VariantType {
        match self {
            Value::Nil => VariantType::Nil,
            Value::Bool(_) => VariantType::Bool,
            Value::Int(_) => VariantType::Int,
            Value::Float(_) => VariantType::Float,
            Value::String(_) => VariantType::String,
            Value::Bytes(_) => VariantType::PackedByteArray,
            Value::StringList(_) => VariantType::PackedStringArray,
            Value::Array(_) => VariantType::Array,
            Value::Dictionary(_) => VariantType::Dictionary,
            Value::Object(_) => VariantType::Object,
        }
    }

    /// Type name for diagnostics; objects report their class
    pub fn type_name(&self) -> String {
        match self {
            Value::Object(object) => object.class_name().to_string(),
            other => other.variant_type().doc_name().to_string(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, with integers widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&BTreeMap<MapKey, Value>> {
        match self {
            Value::Dictionary(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<MapKey> for Value {
    fn from(key: MapKey) -> Self {
        match key {
            MapKey::Bool(b) => Value::Bool(b),
            MapKey::Int(i) => Value::Int(i),
            MapKey::String(s) => Value::String(s),
        }
    }
}

/// Dictionary key; map keys are restricted to integral, bool and string types
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    String(String),
}

impl MapKey {
    /// Key for a value, if the value can be one
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(MapKey::Bool(*b)),
            Value::Int(i) => Some(MapKey::Int(*i)),
            Value::String(s) => Some(MapKey::String(s.clone())),
            _ => None,
        }
    }

    pub fn variant_type(&self) -> VariantType {
        match self {
            MapKey::Bool(_) => VariantType::Bool,
            MapKey::Int(_) => VariantType::Int,
            MapKey::String(_) => VariantType::String,
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Bool(b) => write!(f, "{b}"),
            MapKey::Int(i) => write!(f, "{i}"),
            MapKey::String(s) => write!(f, "{s:?}"),
        }
    }
}
