//! Dynamic instances of registered message classes.
//!
//! [`MessageObject`] implements the accessor contract the generated C++
//! classes expose, against a [`ClassDescriptor`] instead of compiled code:
//!
//! - explicit presence: `has_<f>` reports whether a value was set
//! - message fields: reading an unset field materializes an empty sub-object
//! - repeated fields: `add_<f>`, `get_<f>_at`, `set_<f>_at`, `remove_<f>_at`
//! - map fields: `<f>_get`, `<f>_put`, `<f>_erase`, `<f>_contains`
//! - oneofs: setting one member clears the others
//! - `Any`: `pack_<f>` stores a message with its type URL
//!
//! Every bound method is reachable by name through [`MessageObject::call`].

use crate::descriptor::{ClassDescriptor, MethodBinding, PropertyShape, TypeHint};
use crate::error::{ObjectError, ObjectResult};
use crate::registry::InMemoryRegistry;
use crate::value::{MapKey, Value};
use gdbuf_codegen::AccessorKind;
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Prefix of `Any` type URLs
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/";

/// Shared handle to a message object
///
/// The class descriptor is readable without locking the object.
#[derive(Clone)]
pub struct ObjectRef {
    class: Arc<ClassDescriptor>,
    inner: Arc<Mutex<MessageObject>>,
}

impl ObjectRef {
    pub(crate) fn new(object: MessageObject) -> Self {
        Self {
            class: Arc::clone(&object.class),
            inner: Arc::new(Mutex::new(object)),
        }
    }

    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    pub fn lock(&self) -> MutexGuard<'_, MessageObject> {
        self.inner.lock()
    }

    /// Call a bound method by name
    pub fn call(&self, method: &str, args: &[Value]) -> ObjectResult<Value> {
        self.lock().call(method, args)
    }

    /// Whether both handles point at the same instance
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("class", &self.class.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
enum Slot {
    #[default]
    Unset,
    Set(Value),
    Packed {
        type_url: String,
        message: ObjectRef,
    },
}

/// One instance of a registered message class
#[derive(Debug)]
pub struct MessageObject {
    class: Arc<ClassDescriptor>,
    registry: InMemoryRegistry,
    slots: Vec<Slot>,
    /// Set member per oneof
    cases: Vec<Option<usize>>,
}

impl MessageObject {
    pub(crate) fn new(class: Arc<ClassDescriptor>, registry: InMemoryRegistry) -> Self {
        Self {
            slots: vec![Slot::Unset; class.properties.len()],
            cases: vec![None; class.oneofs.len()],
            class,
            registry,
        }
    }

    pub fn class(&self) -> &ClassDescriptor {
        &self.class
    }

    pub fn get(&mut self, property: &str) -> ObjectResult<Value> {
        let index = self.index(property)?;
        self.get_index(index)
    }

    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> ObjectResult<()> {
        let index = self.index(property)?;
        self.set_index(index, value.into())
    }

    pub fn has(&self, property: &str) -> ObjectResult<bool> {
        let index = self.index(property)?;
        Ok(self.has_index(index))
    }

    pub fn clear(&mut self, property: &str) -> ObjectResult<()> {
        let index = self.index(property)?;
        self.clear_index(index);
        Ok(())
    }

    pub fn size(&self, property: &str) -> ObjectResult<usize> {
        let index = self.index(property)?;
        self.size_index(index)
    }

    pub fn append(&mut self, property: &str, value: impl Into<Value>) -> ObjectResult<()> {
        let index = self.index(property)?;
        self.append_index(index, value.into())
    }

    pub fn get_at(&self, property: &str, position: i64) -> ObjectResult<Value> {
        let index = self.index(property)?;
        self.get_at_index(index, position)
    }

    pub fn set_at(
        &mut self,
        property: &str,
        position: i64,
        value: impl Into<Value>,
    ) -> ObjectResult<()> {
        let index = self.index(property)?;
        self.set_at_index(index, position, value.into())
    }

    pub fn remove_at(&mut self, property: &str, position: i64) -> ObjectResult<()> {
        let index = self.index(property)?;
        self.remove_at_index(index, position)
    }

    /// Value under `key`, `Nil` when absent
    pub fn map_get(&self, property: &str, key: impl Into<Value>) -> ObjectResult<Value> {
        let index = self.index(property)?;
        self.map_get_index(index, &key.into())
    }

    pub fn map_put(
        &mut self,
        property: &str,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> ObjectResult<()> {
        let index = self.index(property)?;
        self.map_put_index(index, &key.into(), value.into())
    }

    /// Remove `key`; returns whether it was present
    pub fn map_erase(&mut self, property: &str, key: impl Into<Value>) -> ObjectResult<bool> {
        let index = self.index(property)?;
        self.map_erase_index(index, &key.into())
    }

    pub fn map_contains(&self, property: &str, key: impl Into<Value>) -> ObjectResult<bool> {
        let index = self.index(property)?;
        self.map_contains_index(index, &key.into())
    }

    pub fn pack(&mut self, property: &str, message: &ObjectRef) -> ObjectResult<()> {
        let index = self.index(property)?;
        self.pack_index(index, message)
    }

    /// Packed message if its type URL names `type_name`, otherwise `Nil`
    pub fn unpack(&self, property: &str, type_name: &str) -> ObjectResult<Value> {
        let index = self.index(property)?;
        self.unpack_index(index, type_name)
    }

    pub fn type_url(&self, property: &str) -> ObjectResult<String> {
        let index = self.index(property)?;
        self.type_url_index(index)
    }

    /// Name of the set member of a oneof, empty when none is set
    pub fn which(&self, oneof: &str) -> ObjectResult<String> {
        let index = self
            .class
            .oneofs
            .iter()
            .position(|o| o.name == oneof)
            .ok_or_else(|| self.unknown_property(oneof))?;
        Ok(self.which_index(index))
    }

    /// Dispatch a bound method by its emitted name
    pub fn call(&mut self, method: &str, args: &[Value]) -> ObjectResult<Value> {
        let class = Arc::clone(&self.class);
        let descriptor = class
            .method(method)
            .ok_or_else(|| ObjectError::UnknownMethod {
                class: class.name.clone(),
                method: method.to_string(),
            })?;
        if descriptor.args.len() != args.len() {
            return Err(ObjectError::ArgumentCount {
                method: method.to_string(),
                expected: descriptor.args.len(),
                actual: args.len(),
            });
        }
        tracing::trace!("{}.{}({} args)", class.name, method, args.len());

        let arg = |position: usize| args.get(position).cloned().unwrap_or_default();
        let int_arg = |position: usize| {
            arg(position).as_int().ok_or_else(|| ObjectError::TypeMismatch {
                property: method.to_string(),
                expected: "int".to_string(),
                actual: arg(position).type_name(),
            })
        };

        match descriptor.binding {
            MethodBinding::Accessor { property, kind } => match kind {
                AccessorKind::Get => self.get_index(property),
                AccessorKind::Set => self.set_index(property, arg(0)).map(|_| Value::Nil),
                AccessorKind::Has => Ok(Value::Bool(self.has_index(property))),
                AccessorKind::Clear => {
                    self.clear_index(property);
                    Ok(Value::Nil)
                }
                AccessorKind::Size => Ok(Value::Int(self.size_index(property)? as i64)),
                AccessorKind::Append => self.append_index(property, arg(0)).map(|_| Value::Nil),
                AccessorKind::GetAt => self.get_at_index(property, int_arg(0)?),
                AccessorKind::SetAt => self
                    .set_at_index(property, int_arg(0)?, arg(1))
                    .map(|_| Value::Nil),
                AccessorKind::RemoveAt => self
                    .remove_at_index(property, int_arg(0)?)
                    .map(|_| Value::Nil),
                AccessorKind::MapGet => self.map_get_index(property, &arg(0)),
                AccessorKind::MapPut => self
                    .map_put_index(property, &arg(0), arg(1))
                    .map(|_| Value::Nil),
                AccessorKind::MapErase => self.map_erase_index(property, &arg(0)).map(Value::Bool),
                AccessorKind::MapContains => {
                    self.map_contains_index(property, &arg(0)).map(Value::Bool)
                }
                AccessorKind::Pack => match arg(0) {
                    Value::Object(message) => self.pack_index(property, &message).map(|_| Value::Nil),
                    other => Err(self.mismatch(property, "Object", &other)),
                },
                AccessorKind::Unpack => match arg(0) {
                    Value::String(type_name) => self.unpack_index(property, &type_name),
                    other => Err(self.mismatch(property, "String", &other)),
                },
                AccessorKind::TypeUrl => self.type_url_index(property).map(Value::String),
            },
            MethodBinding::Discriminator { oneof } => Ok(Value::String(self.which_index(oneof))),
            MethodBinding::DescriptorName => Ok(Value::String(class.schema_name.clone())),
            MethodBinding::Serialize | MethodBinding::Parse => Err(ObjectError::ExternalRuntime {
                method: method.to_string(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Index-based implementation
    // ------------------------------------------------------------------

    fn index(&self, property: &str) -> ObjectResult<usize> {
        self.class
            .property(property)
            .map(|(index, _)| index)
            .ok_or_else(|| self.unknown_property(property))
    }

    fn unknown_property(&self, property: &str) -> ObjectError {
        ObjectError::UnknownProperty {
            class: self.class.name.clone(),
            property: property.to_string(),
        }
    }

    fn mismatch(&self, index: usize, expected: &str, actual: &Value) -> ObjectError {
        ObjectError::TypeMismatch {
            property: self.class.properties[index].name.clone(),
            expected: expected.to_string(),
            actual: actual.type_name(),
        }
    }

    fn require(&self, index: usize, shape: PropertyShape, operation: &str) -> ObjectResult<()> {
        let property = &self.class.properties[index];
        if property.shape == shape {
            Ok(())
        } else {
            Err(ObjectError::UnsupportedOperation {
                property: property.name.clone(),
                operation: operation.to_string(),
            })
        }
    }

    fn check(&self, index: usize, hint: Option<&TypeHint>, value: &Value) -> ObjectResult<()> {
        match hint {
            Some(hint) if !hint.accepts(value) => Err(self.mismatch(index, hint.name(), value)),
            _ => Ok(()),
        }
    }

    fn key(&self, index: usize, key: &Value) -> ObjectResult<MapKey> {
        let property = &self.class.properties[index];
        let invalid = || ObjectError::InvalidKey {
            property: property.name.clone(),
            key: key.type_name(),
        };
        let map_key = MapKey::from_value(key).ok_or_else(invalid)?;
        match &property.key {
            Some(hint) if hint.variant != map_key.variant_type() => Err(invalid()),
            _ => Ok(map_key),
        }
    }

    /// Store a slot, keeping oneof members exclusive
    fn assign(&mut self, index: usize, slot: Slot) {
        if let Some(oneof) = self.class.properties[index].oneof {
            if let Some(members) = self.class.oneofs.get(oneof).map(|o| o.members.clone()) {
                for member in members.into_iter().filter(|m| *m != index) {
                    self.slots[member] = Slot::Unset;
                }
            }
            self.cases[oneof] = Some(index);
        }
        self.slots[index] = slot;
    }

    fn get_index(&mut self, index: usize) -> ObjectResult<Value> {
        match &self.slots[index] {
            Slot::Set(value) => return Ok(value.clone()),
            Slot::Packed { message, .. } => return Ok(Value::Object(message.clone())),
            Slot::Unset => {}
        }

        let class = Arc::clone(&self.class);
        let property = &class.properties[index];
        match (&property.shape, &property.message_class) {
            (PropertyShape::Singular, Some(target)) => {
                let message = self.registry.instantiate(target)?;
                // Reading a oneof member never changes the active case.
                if property.oneof.is_some() {
                    return Ok(Value::Object(message));
                }
                tracing::debug!("{}.{} materialized as {}", class.name, property.name, target);
                self.assign(index, Slot::Set(Value::Object(message.clone())));
                Ok(Value::Object(message))
            }
            (PropertyShape::Any, _) => Ok(Value::Nil),
            _ => Ok(property.default_value()),
        }
    }

    fn set_index(&mut self, index: usize, value: Value) -> ObjectResult<()> {
        let class = Arc::clone(&self.class);
        let property = &class.properties[index];
        match property.shape {
            PropertyShape::Any => Err(ObjectError::UnsupportedOperation {
                property: property.name.clone(),
                operation: "set".to_string(),
            }),
            PropertyShape::Singular => {
                if value.is_nil() && property.message_class.is_some() {
                    self.clear_index(index);
                    return Ok(());
                }
                self.check(index, Some(&property.value), &value)?;
                self.assign(index, Slot::Set(value));
                Ok(())
            }
            PropertyShape::Repeated => {
                let Value::Array(items) = &value else {
                    return Err(self.mismatch(index, "Array", &value));
                };
                for item in items {
                    self.check(index, property.element.as_ref(), item)?;
                }
                self.assign(index, Slot::Set(value));
                Ok(())
            }
            PropertyShape::Map => {
                let Value::Dictionary(entries) = &value else {
                    return Err(self.mismatch(index, "Dictionary", &value));
                };
                for (key, item) in entries {
                    self.key(index, &Value::from(key.clone()))?;
                    self.check(index, property.element.as_ref(), item)?;
                }
                self.assign(index, Slot::Set(value));
                Ok(())
            }
        }
    }

    fn has_index(&self, index: usize) -> bool {
        match self.class.properties[index].oneof {
            Some(oneof) => self.cases[oneof] == Some(index),
            None => !matches!(self.slots[index], Slot::Unset),
        }
    }

    fn clear_index(&mut self, index: usize) {
        self.slots[index] = Slot::Unset;
        if let Some(oneof) = self.class.properties[index].oneof
            && self.cases[oneof] == Some(index)
        {
            self.cases[oneof] = None;
        }
    }

    fn which_index(&self, oneof: usize) -> String {
        self.cases
            .get(oneof)
            .copied()
            .flatten()
            .map(|index| self.class.properties[index].name.clone())
            .unwrap_or_default()
    }

    fn items(&self, index: usize) -> &[Value] {
        match &self.slots[index] {
            Slot::Set(Value::Array(items)) => items,
            _ => &[],
        }
    }

    fn update_items<R>(&mut self, index: usize, update: impl FnOnce(&mut Vec<Value>) -> R) -> R {
        let mut items = match std::mem::take(&mut self.slots[index]) {
            Slot::Set(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        let result = update(&mut items);
        self.slots[index] = Slot::Set(Value::Array(items));
        result
    }

    fn entries(&self, index: usize) -> Option<&BTreeMap<MapKey, Value>> {
        match &self.slots[index] {
            Slot::Set(Value::Dictionary(entries)) => Some(entries),
            _ => None,
        }
    }

    fn update_entries<R>(
        &mut self,
        index: usize,
        update: impl FnOnce(&mut BTreeMap<MapKey, Value>) -> R,
    ) -> R {
        let mut entries = match std::mem::take(&mut self.slots[index]) {
            Slot::Set(Value::Dictionary(entries)) => entries,
            _ => BTreeMap::new(),
        };
        let result = update(&mut entries);
        self.slots[index] = Slot::Set(Value::Dictionary(entries));
        result
    }

    fn position(&self, index: usize, position: i64) -> ObjectResult<usize> {
        let size = self.items(index).len();
        usize::try_from(position)
            .ok()
            .filter(|p| *p < size)
            .ok_or_else(|| ObjectError::IndexOutOfRange {
                property: self.class.properties[index].name.clone(),
                index: position,
                size,
            })
    }

    fn size_index(&self, index: usize) -> ObjectResult<usize> {
        match self.class.properties[index].shape {
            PropertyShape::Repeated => Ok(self.items(index).len()),
            PropertyShape::Map => Ok(self.entries(index).map_or(0, |e| e.len())),
            _ => self.require(index, PropertyShape::Repeated, "size").map(|_| 0),
        }
    }

    fn append_index(&mut self, index: usize, value: Value) -> ObjectResult<()> {
        self.require(index, PropertyShape::Repeated, "append")?;
        self.check(index, self.class.properties[index].element.as_ref(), &value)?;
        self.update_items(index, |items| items.push(value));
        Ok(())
    }

    fn get_at_index(&self, index: usize, position: i64) -> ObjectResult<Value> {
        self.require(index, PropertyShape::Repeated, "get_at")?;
        let position = self.position(index, position)?;
        Ok(self.items(index)[position].clone())
    }

    fn set_at_index(&mut self, index: usize, position: i64, value: Value) -> ObjectResult<()> {
        self.require(index, PropertyShape::Repeated, "set_at")?;
        let position = self.position(index, position)?;
        self.check(index, self.class.properties[index].element.as_ref(), &value)?;
        self.update_items(index, |items| items[position] = value);
        Ok(())
    }

    fn remove_at_index(&mut self, index: usize, position: i64) -> ObjectResult<()> {
        self.require(index, PropertyShape::Repeated, "remove_at")?;
        let position = self.position(index, position)?;
        self.update_items(index, |items| items.remove(position));
        Ok(())
    }

    fn map_get_index(&self, index: usize, key: &Value) -> ObjectResult<Value> {
        self.require(index, PropertyShape::Map, "map_get")?;
        let key = self.key(index, key)?;
        Ok(self
            .entries(index)
            .and_then(|e| e.get(&key))
            .cloned()
            .unwrap_or_default())
    }

    fn map_put_index(&mut self, index: usize, key: &Value, value: Value) -> ObjectResult<()> {
        self.require(index, PropertyShape::Map, "map_put")?;
        let key = self.key(index, key)?;
        self.check(index, self.class.properties[index].element.as_ref(), &value)?;
        self.update_entries(index, |entries| entries.insert(key, value));
        Ok(())
    }

    fn map_erase_index(&mut self, index: usize, key: &Value) -> ObjectResult<bool> {
        self.require(index, PropertyShape::Map, "map_erase")?;
        let key = self.key(index, key)?;
        if self.entries(index).is_none() {
            return Ok(false);
        }
        Ok(self.update_entries(index, |entries| entries.remove(&key).is_some()))
    }

    fn map_contains_index(&self, index: usize, key: &Value) -> ObjectResult<bool> {
        self.require(index, PropertyShape::Map, "map_contains")?;
        let key = self.key(index, key)?;
        Ok(self.entries(index).is_some_and(|e| e.contains_key(&key)))
    }

    fn pack_index(&mut self, index: usize, message: &ObjectRef) -> ObjectResult<()> {
        self.require(index, PropertyShape::Any, "pack")?;
        if !message.class().is_message() {
            return Err(self.mismatch(index, "message", &Value::Object(message.clone())));
        }
        let type_url = format!("{TYPE_URL_PREFIX}{}", message.class().schema_name);
        self.assign(
            index,
            Slot::Packed {
                type_url,
                message: message.clone(),
            },
        );
        Ok(())
    }

    fn unpack_index(&self, index: usize, type_name: &str) -> ObjectResult<Value> {
        self.require(index, PropertyShape::Any, "unpack")?;
        match &self.slots[index] {
            Slot::Packed { type_url, message }
                if type_url
                    .rsplit_once('/')
                    .is_some_and(|(_, name)| name == type_name) =>
            {
                Ok(Value::Object(message.clone()))
            }
            _ => Ok(Value::Nil),
        }
    }

    fn type_url_index(&self, index: usize) -> ObjectResult<String> {
        self.require(index, PropertyShape::Any, "type_url")?;
        match &self.slots[index] {
            Slot::Packed { type_url, .. } => Ok(type_url.clone()),
            _ => Ok(String::new()),
        }
    }
}

#[cfg(test)]
#[path = "object/object_tests.rs"]
mod object_tests;
