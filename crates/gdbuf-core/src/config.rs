//! Generator configuration (`gdbuf.toml`)

use crate::error::ConfigError;
use crate::phase::InitializationLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Generator configuration
///
/// Every key is optional; a missing `gdbuf.toml` is equivalent to an empty one.
///
/// ```toml
/// extension_name = "gdbufgen"
/// namespace = "gdbuf"
/// initialization_level = "scene"
/// include_dirs = ["third_party/proto"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Name of the generated extension; also prefixes the enum table class
    #[serde(default = "default_extension_name")]
    pub extension_name: String,

    /// Root C++ namespace for generated classes
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Host initialization level at which classes are registered
    #[serde(default)]
    pub initialization_level: InitializationLevel,

    /// Host base class every message class derives from
    #[serde(default = "default_base_class")]
    pub base_class: String,

    /// Emit `doc_classes/*.xml` class reference files
    #[serde(default = "default_true")]
    pub emit_docs: bool,

    /// Emit the aggregate `<extension>Enums` constants class
    #[serde(default = "default_true")]
    pub enum_table: bool,

    /// Additional directories searched for imported schema files
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    /// Default log level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Minimum host version written to the `.gdextension` descriptor
    #[serde(default = "default_compatibility_minimum")]
    pub compatibility_minimum: String,
}

fn default_extension_name() -> String {
    "gdbufgen".to_string()
}

fn default_namespace() -> String {
    "gdbuf".to_string()
}

fn default_base_class() -> String {
    "RefCounted".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_compatibility_minimum() -> String {
    "4.1".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            extension_name: default_extension_name(),
            namespace: default_namespace(),
            initialization_level: InitializationLevel::default(),
            base_class: default_base_class(),
            emit_docs: true,
            enum_table: true,
            include_dirs: Vec::new(),
            log_level: default_log_level(),
            compatibility_minimum: default_compatibility_minimum(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Name of the aggregate enum constants class
    pub fn enum_table_class(&self) -> String {
        format!("{}Enums", self.extension_name)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension_name.is_empty() {
            return Err(ConfigError::Invalid(
                "extension_name cannot be empty".to_string(),
            ));
        }
        if !is_identifier(&self.extension_name) {
            return Err(ConfigError::Invalid(format!(
                "extension_name `{}` is not a valid identifier",
                self.extension_name
            )));
        }

        if self.namespace.is_empty() || !self.namespace.split("::").all(is_identifier) {
            return Err(ConfigError::Invalid(format!(
                "namespace `{}` is not a valid C++ namespace",
                self.namespace
            )));
        }

        if !is_identifier(&self.base_class) {
            return Err(ConfigError::Invalid(format!(
                "base_class `{}` is not a valid class name",
                self.base_class
            )));
        }

        if !is_valid_log_level(&self.log_level) {
            return Err(ConfigError::Invalid(format!(
                "log_level `{}` must be one of trace, debug, info, warn, error",
                self.log_level
            )));
        }

        // Host versions are `major.minor`
        let version_ok = self
            .compatibility_minimum
            .split_once('.')
            .is_some_and(|(major, minor)| {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.chars().all(|c| c.is_ascii_digit())
                    && minor.chars().all(|c| c.is_ascii_digit())
            });
        if !version_ok {
            return Err(ConfigError::Invalid(format!(
                "compatibility_minimum `{}` should look like 4.1",
                self.compatibility_minimum
            )));
        }

        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_valid_log_level(level: &str) -> bool {
    ["trace", "debug", "info", "warn", "error"].contains(&level)
}
