//! Error types for the host adapter

use thiserror::Error;

/// Result type alias for registry and registrar operations
pub type HostResult<T> = Result<T, HostError>;

/// Result type alias for message object operations
pub type ObjectResult<T> = Result<T, ObjectError>;

/// Error raised by a host registry or the registrar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A class with this name is already registered
    #[error("class already registered: {0}")]
    DuplicateClass(String),

    /// A property references a class that is neither registered, declared,
    /// nor the class itself
    #[error("class {class} references unknown class {target}")]
    UnresolvedReference { class: String, target: String },

    /// The class is not known to the registry
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// The registrar is not in a valid state for the requested operation
    #[error("invalid registration state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    /// The host rejected a class during initialization or teardown
    #[error("registration of {class} failed: {reason}")]
    RegistrationFailed { class: String, reason: String },

    /// A process-wide registrar is already installed
    #[error("a process-wide registrar is already installed")]
    AlreadyInstalled,
}

impl HostError {
    /// Stable numeric code for the error kind
    pub fn error_code(&self) -> u32 {
        match self {
            HostError::DuplicateClass(_) => 1,
            HostError::UnresolvedReference { .. } => 2,
            HostError::UnknownClass(_) => 3,
            HostError::InvalidState { .. } => 4,
            HostError::RegistrationFailed { .. } => 5,
            HostError::AlreadyInstalled => 6,
        }
    }
}

/// Error raised when driving a generated class's accessor contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    #[error("{class} has no property {property}")]
    UnknownProperty { class: String, property: String },

    #[error("{class} has no method {method}")]
    UnknownMethod { class: String, method: String },

    #[error("{method} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// Value does not fit the property's host type
    #[error("{property} expects {expected}, got {actual}")]
    TypeMismatch {
        property: String,
        expected: String,
        actual: String,
    },

    #[error("{property}: index {index} out of range for size {size}")]
    IndexOutOfRange {
        property: String,
        index: i64,
        size: usize,
    },

    /// Operation does not apply to the property's shape, e.g. `append` on a
    /// singular field
    #[error("{property} does not support {operation}")]
    UnsupportedOperation { property: String, operation: String },

    #[error("{property}: {key} is not a valid map key")]
    InvalidKey { property: String, key: String },

    /// Class is not registered or cannot be instantiated
    #[error("cannot instantiate {0}")]
    NotInstantiable(String),

    /// Method is implemented by the external serialization runtime
    #[error("{method} requires the wire runtime")]
    ExternalRuntime { method: String },
}

impl ObjectError {
    /// Stable numeric code for the error kind
    pub fn error_code(&self) -> u32 {
        match self {
            ObjectError::UnknownProperty { .. } => 1,
            ObjectError::UnknownMethod { .. } => 2,
            ObjectError::ArgumentCount { .. } => 3,
            ObjectError::TypeMismatch { .. } => 4,
            ObjectError::IndexOutOfRange { .. } => 5,
            ObjectError::UnsupportedOperation { .. } => 6,
            ObjectError::InvalidKey { .. } => 7,
            ObjectError::NotInstantiable(_) => 8,
            ObjectError::ExternalRuntime { .. } => 9,
        }
    }
}
