//! Error types for schema ingestion, validation and configuration

use crate::schema::MAX_FIELD_NUMBER;
use std::fmt;
use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Where in the schema set an error was found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Schema file path, relative to its schema root
    pub file: String,
    /// Message (or enum) path within the file, e.g. `Outer.Inner`
    pub message: String,
    /// Offending field, when the error concerns a single field
    pub field: Option<String>,
}

impl Location {
    /// Location of a message or enum
    pub fn message(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            field: None,
        }
    }

    /// Location of a field within a message
    pub fn field(
        file: impl Into<String>,
        message: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.message.is_empty(), &self.field) {
            (true, _) => write!(f, "{}", self.file),
            (false, None) => write!(f, "{}: {}", self.file, self.message),
            (false, Some(field)) => write!(f, "{}: {}.{}", self.file, self.message, field),
        }
    }
}

/// Error type for malformed or ambiguous schemas
///
/// Every variant is fatal to a generation run: partial bindings would
/// silently omit fields that downstream code depends on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Schema source could not be parsed
    #[error("{file}:{line}:{column}: syntax error: {detail}")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
        detail: String,
    },

    /// Two fields of one message share a field number
    #[error("{location}: field number {number} is already used by `{existing}`")]
    DuplicateFieldNumber {
        location: Location,
        number: u32,
        existing: String,
    },

    /// A name is declared twice within one scope
    #[error("{location}: `{name}` is already defined in scope `{scope}`")]
    DuplicateName {
        location: Location,
        scope: String,
        name: String,
    },

    /// Field number outside `1..=536870911`
    #[error("{location}: field number {number} is outside 1..={max}", max = MAX_FIELD_NUMBER)]
    InvalidFieldNumber { location: Location, number: i64 },

    /// Enum value number outside the 32-bit signed range
    #[error("{location}: enum value {number} does not fit in int32")]
    InvalidEnumValue { location: Location, number: i64 },

    /// Map key is not an integral scalar, bool, string or enum
    #[error("{location}: `{key_type}` is not a valid map key type")]
    InvalidMapKeyType { location: Location, key_type: String },

    /// Field cannot be a member of the named oneof
    #[error("{location}: invalid member of oneof `{oneof}`: {reason}")]
    InvalidOneofMember {
        location: Location,
        oneof: String,
        reason: String,
    },

    /// Container nesting the schema language does not allow
    #[error("{location}: invalid nesting: {reason}")]
    InvalidNesting { location: Location, reason: String },

    /// Field uses a reserved number or name
    #[error("{location}: {reason}")]
    ReservedFieldUse { location: Location, reason: String },

    /// Field type names a type that is never defined
    #[error("{location}: unresolved type reference `{type_name}`")]
    UnresolvedTypeReference {
        location: Location,
        type_name: String,
    },

    /// Binary descriptor set is structurally invalid
    #[error("{file}: invalid descriptor: {detail}")]
    InvalidDescriptor { file: String, detail: String },
}

impl SchemaError {
    /// Stable numeric code for diagnostics and exit statuses
    pub fn error_code(&self) -> u32 {
        match self {
            SchemaError::Syntax { .. } => 1,
            SchemaError::DuplicateFieldNumber { .. } => 2,
            SchemaError::DuplicateName { .. } => 3,
            SchemaError::InvalidFieldNumber { .. } => 4,
            SchemaError::InvalidEnumValue { .. } => 5,
            SchemaError::InvalidMapKeyType { .. } => 6,
            SchemaError::InvalidOneofMember { .. } => 7,
            SchemaError::InvalidNesting { .. } => 8,
            SchemaError::ReservedFieldUse { .. } => 9,
            SchemaError::UnresolvedTypeReference { .. } => 10,
            SchemaError::InvalidDescriptor { .. } => 11,
        }
    }

    /// Schema file the error was found in
    pub fn file(&self) -> &str {
        match self {
            SchemaError::Syntax { file, .. } | SchemaError::InvalidDescriptor { file, .. } => file,
            SchemaError::DuplicateFieldNumber { location, .. }
            | SchemaError::DuplicateName { location, .. }
            | SchemaError::InvalidFieldNumber { location, .. }
            | SchemaError::InvalidEnumValue { location, .. }
            | SchemaError::InvalidMapKeyType { location, .. }
            | SchemaError::InvalidOneofMember { location, .. }
            | SchemaError::InvalidNesting { location, .. }
            | SchemaError::ReservedFieldUse { location, .. }
            | SchemaError::UnresolvedTypeReference { location, .. } => &location.file,
        }
    }
}

/// Error type for generator configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected shape
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
