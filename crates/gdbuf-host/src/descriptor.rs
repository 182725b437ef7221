//! Host-facing class descriptors built from generated classes.
//!
//! A [`ClassDescriptor`] is what the host class database receives for one
//! generated class: its properties with their variant types and accessor
//! names, every bound method, oneof discriminators and integer constants.

use crate::value::Value;
use gdbuf_codegen::host_types::{HostType, VariantType};
use gdbuf_codegen::{AccessorKind, ClassOrigin, GeneratedClass, MappedType, Property};
use std::collections::HashMap;

/// What a registered class was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Message,
    Enum,
    EnumTable,
}

/// Container shape of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyShape {
    Singular,
    Repeated,
    Map,
    /// `google.protobuf.Any`, driven by pack/unpack
    Any,
}

/// Expected host type of a value slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHint {
    pub variant: VariantType,
    pub class_name: Option<String>,
}

impl TypeHint {
    fn from_host(host: &HostType) -> Self {
        Self {
            variant: host.variant,
            class_name: host.class_name.clone(),
        }
    }

    /// Whether `value` can be stored in a slot of this type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self.variant, value) {
            (VariantType::Nil, _) => true,
            (VariantType::Float, Value::Int(_)) => true,
            (VariantType::Object, Value::Object(object)) => match &self.class_name {
                None => true,
                Some(expected) => {
                    object.class_name() == expected || object.class().base == *expected
                }
            },
            (variant, value) => value.variant_type() == variant,
        }
    }

    /// Type name for diagnostics
    pub fn name(&self) -> &str {
        self.class_name
            .as_deref()
            .unwrap_or_else(|| self.variant.doc_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub number: u32,
    pub shape: PropertyShape,
    /// Type of the whole property value
    pub value: TypeHint,
    /// Element type of a repeated property, value type of a map
    pub element: Option<TypeHint>,
    /// Key type of a map
    pub key: Option<TypeHint>,
    /// Generated class instantiated for message-typed values
    pub message_class: Option<String>,
    pub presence: bool,
    /// Index into [`ClassDescriptor::oneofs`]
    pub oneof: Option<usize>,
    pub getter: Option<String>,
    pub setter: Option<String>,
    pub docs: Option<String>,
}

impl PropertyDescriptor {
    /// Value a property reads as while unset
    pub fn default_value(&self) -> Value {
        Value::default_for(self.value.variant)
    }
}

/// What a bound method does when called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodBinding {
    Accessor { property: usize, kind: AccessorKind },
    /// `which_<oneof>`
    Discriminator { oneof: usize },
    DescriptorName,
    Serialize,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub args: Vec<String>,
    pub binding: MethodBinding,
    pub is_const: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofDescriptor {
    pub name: String,
    /// Indices into [`ClassDescriptor::properties`]
    pub members: Vec<usize>,
    pub discriminator: String,
}

/// Everything the host needs to register one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    /// Host class name
    pub name: String,
    /// `namespace::Name` of the generated C++ class
    pub qualified_name: String,
    /// Fully-qualified schema name; empty for the enum table
    pub schema_name: String,
    pub base: String,
    pub kind: ClassKind,
    pub properties: Vec<PropertyDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub oneofs: Vec<OneofDescriptor>,
    pub constants: Vec<(String, i64)>,
}

impl ClassDescriptor {
    pub fn is_message(&self) -> bool {
        self.kind == ClassKind::Message
    }

    /// Property index and descriptor by name
    pub fn property(&self, name: &str) -> Option<(usize, &PropertyDescriptor)> {
        self.properties
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn constant(&self, name: &str) -> Option<i64> {
        self.constants
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Classes named by message-typed properties, first occurrence order
    pub fn references(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for class in self.properties.iter().filter_map(|p| p.message_class.as_deref()) {
            if !seen.contains(&class) {
                seen.push(class);
            }
        }
        seen
    }
}

/// Describe every class of a generation run, in the given order
pub fn describe(classes: &[GeneratedClass]) -> Vec<ClassDescriptor> {
    let names: HashMap<&str, &str> = classes
        .iter()
        .filter(|c| !c.schema_name.is_empty())
        .map(|c| (c.schema_name.as_str(), c.name.as_str()))
        .collect();
    classes.iter().map(|c| describe_class(c, &names)).collect()
}

fn describe_class(class: &GeneratedClass, names: &HashMap<&str, &str>) -> ClassDescriptor {
    let kind = match class.origin {
        ClassOrigin::Message(_) => ClassKind::Message,
        ClassOrigin::Enum(_) => ClassKind::Enum,
        ClassOrigin::EnumTable => ClassKind::EnumTable,
    };

    let properties = class
        .properties
        .iter()
        .map(|p| describe_property(p, names))
        .collect();

    let mut methods: Vec<MethodDescriptor> = Vec::new();
    for (index, property) in class.properties.iter().enumerate() {
        for accessor in &property.accessors {
            methods.push(MethodDescriptor {
                name: accessor.method.clone(),
                args: accessor.params.iter().map(|p| p.name.clone()).collect(),
                binding: MethodBinding::Accessor {
                    property: index,
                    kind: accessor.kind,
                },
                is_const: accessor.is_const,
            });
        }
    }

    let oneofs: Vec<OneofDescriptor> = class
        .oneofs
        .iter()
        .map(|o| OneofDescriptor {
            name: o.name.clone(),
            members: o
                .members
                .iter()
                .filter_map(|m| class.properties.iter().position(|p| p.name == *m))
                .collect(),
            discriminator: o.discriminator.clone(),
        })
        .collect();

    if kind == ClassKind::Message {
        for (index, oneof) in oneofs.iter().enumerate() {
            let binding = MethodBinding::Discriminator { oneof: index };
            methods.push(builtin(&oneof.discriminator, &[], binding, true));
        }
        methods.push(builtin("get_descriptor_name", &[], MethodBinding::DescriptorName, true));
        methods.push(builtin("serialize", &[], MethodBinding::Serialize, true));
        methods.push(builtin("parse", &["bytes"], MethodBinding::Parse, false));
    }

    ClassDescriptor {
        name: class.name.clone(),
        qualified_name: class.qualified_name(),
        schema_name: class.schema_name.clone(),
        base: class.base.clone(),
        kind,
        properties,
        methods,
        oneofs,
        constants: class
            .constants
            .iter()
            .map(|c| (c.name.clone(), c.value))
            .collect(),
    }
}

fn builtin(name: &str, args: &[&str], binding: MethodBinding, is_const: bool) -> MethodDescriptor {
    MethodDescriptor {
        name: name.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        binding,
        is_const,
    }
}

fn describe_property(property: &Property, names: &HashMap<&str, &str>) -> PropertyDescriptor {
    let shape = match &property.mapped {
        MappedType::Repeated(_) => PropertyShape::Repeated,
        MappedType::Map(..) => PropertyShape::Map,
        mapped if mapped.is_any() => PropertyShape::Any,
        _ => PropertyShape::Singular,
    };

    // Element and key types come from the parameters of the mutating accessors.
    let param_hint = |kind: AccessorKind, index: usize| {
        property
            .accessor(kind)
            .and_then(|a| a.params.get(index))
            .map(|p| TypeHint::from_host(&p.host))
    };
    let (element, key) = match shape {
        PropertyShape::Repeated => (param_hint(AccessorKind::Append, 0), None),
        PropertyShape::Map => (
            param_hint(AccessorKind::MapPut, 1),
            param_hint(AccessorKind::MapPut, 0),
        ),
        PropertyShape::Singular | PropertyShape::Any => (None, None),
    };

    PropertyDescriptor {
        name: property.name.clone(),
        number: property.number,
        shape,
        value: TypeHint::from_host(&property.host),
        element,
        key,
        message_class: property
            .mapped
            .referenced_message()
            .and_then(|target| names.get(target))
            .map(|name| name.to_string()),
        presence: property.presence,
        oneof: property.oneof,
        getter: property.getter().map(str::to_string),
        setter: property.setter().map(str::to_string),
        docs: property.docs.clone(),
    }
}
