//! Host class registry seam.
//!
//! [`HostRegistry`] is the slice of the host's class database the registrar
//! drives. [`InMemoryRegistry`] is the reference implementation used by tests,
//! by `gdbuf inspect`, and to instantiate [`MessageObject`]s.
//!
//! [`MessageObject`]: crate::MessageObject

use crate::descriptor::ClassDescriptor;
use crate::error::{HostError, HostResult, ObjectError, ObjectResult};
use crate::object::{MessageObject, ObjectRef};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Class-registration API of the host runtime
pub trait HostRegistry: Send + Sync {
    /// Make a class name known before its shape, so cyclic references resolve
    fn declare_class(&self, name: &str) -> HostResult<()>;

    /// Register the full shape of a class
    fn register_class(&self, class: Arc<ClassDescriptor>) -> HostResult<()>;

    fn unregister_class(&self, name: &str) -> HostResult<()>;

    /// Whether the host tears classes down itself at shutdown
    fn manages_class_lifetime(&self) -> bool;
}

#[derive(Debug, Default)]
struct RegistryInner {
    classes: HashMap<String, Arc<ClassDescriptor>>,
    /// Registration order
    order: Vec<String>,
    declared: HashSet<String>,
}

/// In-process class database
///
/// Cloning yields another handle to the same registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    manages_lifetime: bool,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that reports managing class lifetime, so the registrar
    /// leaves teardown to it
    pub fn managing_lifetime() -> Self {
        Self {
            manages_lifetime: true,
            ..Self::default()
        }
    }

    pub fn class(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        self.inner.read().classes.get(name).cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.read().classes.contains_key(name)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.inner.read().declared.contains(name)
    }

    /// Registered class names in registration order
    pub fn registered(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().classes.is_empty()
    }

    /// Create an empty instance of a registered message class
    pub fn instantiate(&self, name: &str) -> ObjectResult<ObjectRef> {
        let class = self
            .class(name)
            .filter(|c| c.is_message())
            .ok_or_else(|| ObjectError::NotInstantiable(name.to_string()))?;
        Ok(ObjectRef::new(MessageObject::new(class, self.clone())))
    }
}

impl HostRegistry for InMemoryRegistry {
    fn declare_class(&self, name: &str) -> HostResult<()> {
        let mut inner = self.inner.write();
        if inner.classes.contains_key(name) {
            return Err(HostError::DuplicateClass(name.to_string()));
        }
        inner.declared.insert(name.to_string());
        Ok(())
    }

    fn register_class(&self, class: Arc<ClassDescriptor>) -> HostResult<()> {
        let mut inner = self.inner.write();
        if inner.classes.contains_key(&class.name) {
            return Err(HostError::DuplicateClass(class.name.clone()));
        }
        if let Some(target) = class.references().into_iter().find(|target| {
            *target != class.name
                && !inner.classes.contains_key(*target)
                && !inner.declared.contains(*target)
        }) {
            return Err(HostError::UnresolvedReference {
                class: class.name.clone(),
                target: target.to_string(),
            });
        }

        inner.declared.remove(&class.name);
        inner.order.push(class.name.clone());
        inner.classes.insert(class.name.clone(), class);
        Ok(())
    }

    fn unregister_class(&self, name: &str) -> HostResult<()> {
        let mut inner = self.inner.write();
        if inner.classes.remove(name).is_none() {
            return Err(HostError::UnknownClass(name.to_string()));
        }
        inner.order.retain(|n| n != name);
        Ok(())
    }

    fn manages_class_lifetime(&self) -> bool {
        self.manages_lifetime
    }
}

#[cfg(test)]
#[path = "registry/registry_tests.rs"]
mod registry_tests;
