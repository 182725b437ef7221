//! Phase-guarded registration of a generated class set.

use crate::descriptor::{ClassDescriptor, describe};
use crate::error::{HostError, HostResult};
use crate::registry::HostRegistry;
use crate::state::RegistrationState;
use gdbuf_codegen::{GeneratedClass, Generation, RegistrationTable};
use gdbuf_core::InitializationLevel;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

/// Process-wide registrar
static REGISTRAR: OnceCell<Registrar> = OnceCell::new();

/// Hands a registration table to the host exactly once per initialization
///
/// The host calls [`initialize`](Registrar::initialize) and
/// [`terminate`](Registrar::terminate) once per [`InitializationLevel`]; both
/// are no-ops except at the level the table was built for.
#[derive(Debug)]
pub struct Registrar {
    level: InitializationLevel,
    /// Descriptors in registration order
    classes: Vec<Arc<ClassDescriptor>>,
    /// Host names declared before registration starts
    header_first: Vec<String>,
    state: Mutex<RegistrationState>,
}

impl Registrar {
    pub fn new(classes: &[GeneratedClass], table: &RegistrationTable) -> Self {
        let descriptors = describe(classes);
        let ordered = table
            .entries()
            .iter()
            .filter_map(|entry| descriptors.get(entry.class).cloned().map(Arc::new))
            .collect();
        let header_first = table
            .header_first()
            .filter_map(|entry| classes.get(entry.class).map(|c| c.name.clone()))
            .collect();

        Self {
            level: table.level(),
            classes: ordered,
            header_first,
            state: Mutex::new(RegistrationState::Pending),
        }
    }

    pub fn from_generation(generation: &Generation) -> Self {
        Self::new(&generation.classes, &generation.table)
    }

    pub fn level(&self) -> InitializationLevel {
        self.level
    }

    pub fn state(&self) -> RegistrationState {
        *self.state.lock()
    }

    pub fn classes(&self) -> &[Arc<ClassDescriptor>] {
        &self.classes
    }

    pub fn header_first(&self) -> &[String] {
        &self.header_first
    }

    /// Host class names in registration order
    pub fn order(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    /// Register every class with `host` when `level` is the registration level
    ///
    /// A host failure leaves the registrar `Failed` and unregisters the
    /// classes registered so far; registration is not retried.
    pub fn initialize(
        &self,
        level: InitializationLevel,
        host: &dyn HostRegistry,
    ) -> HostResult<()> {
        if level != self.level {
            tracing::debug!(
                "Skipping initialization at level {} (registering at {})",
                level,
                self.level
            );
            return Ok(());
        }

        let mut state = self.state.lock();
        if !state.can_transition_to(RegistrationState::Registered) {
            return Err(HostError::InvalidState {
                expected: "Pending or Terminated".to_string(),
                actual: state.to_string(),
            });
        }

        for name in &self.header_first {
            if let Err(e) = host.declare_class(name) {
                return Err(fail(&mut state, name, e));
            }
            tracing::debug!("Declared class {} header-first", name);
        }
        for (index, class) in self.classes.iter().enumerate() {
            if let Err(e) = host.register_class(Arc::clone(class)) {
                let error = fail(&mut state, &class.name, e);
                self.roll_back(&self.classes[..index], host);
                return Err(error);
            }
            tracing::debug!("Registered class {}", class.qualified_name);
        }

        *state = RegistrationState::Registered;
        tracing::info!("Registered {} classes at level {}", self.classes.len(), level);
        Ok(())
    }

    /// Tear registration down when `level` is the registration level
    ///
    /// Classes are unregistered in reverse order unless the host manages
    /// class lifetime itself.
    pub fn terminate(
        &self,
        level: InitializationLevel,
        host: &dyn HostRegistry,
    ) -> HostResult<()> {
        if level != self.level {
            return Ok(());
        }

        let mut state = self.state.lock();
        match *state {
            RegistrationState::Registered => {}
            RegistrationState::Terminated | RegistrationState::Failed => return Ok(()),
            RegistrationState::Pending => {
                return Err(HostError::InvalidState {
                    expected: "Registered".to_string(),
                    actual: state.to_string(),
                });
            }
        }

        if !host.manages_class_lifetime() {
            for class in self.classes.iter().rev() {
                if let Err(e) = host.unregister_class(&class.name) {
                    return Err(fail(&mut state, &class.name, e));
                }
            }
        }

        *state = RegistrationState::Terminated;
        tracing::info!("Terminated registration at level {}", level);
        Ok(())
    }

    /// Unregister the classes a failed initialization got through, newest first
    fn roll_back(&self, registered: &[Arc<ClassDescriptor>], host: &dyn HostRegistry) {
        if host.manages_class_lifetime() {
            return;
        }
        for class in registered.iter().rev() {
            if let Err(e) = host.unregister_class(&class.name) {
                tracing::warn!("Rollback of {} failed: {}", class.name, e);
            }
        }
        tracing::info!("Rolled back {} registered classes", registered.len());
    }

    /// Install as the process-wide registrar; only the first install wins
    pub fn install(self) -> HostResult<&'static Registrar> {
        REGISTRAR
            .try_insert(self)
            .map_err(|_| HostError::AlreadyInstalled)
    }

    pub fn global() -> Option<&'static Registrar> {
        REGISTRAR.get()
    }
}

fn fail(state: &mut RegistrationState, class: &str, error: HostError) -> HostError {
    *state = RegistrationState::Failed;
    tracing::error!("Registration of {} failed: {}", class, error);
    HostError::RegistrationFailed {
        class: class.to_string(),
        reason: error.to_string(),
    }
}
