//! Host initialization phases

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Initialization level the host passes to extension initializers and terminators
///
/// The host walks these levels in order on startup and in reverse on shutdown:
/// ```text
/// Core → Servers → Scene → Editor
/// ```
/// Generated classes are registered at exactly one level; the initializer and
/// terminator are no-ops at every other level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InitializationLevel {
    /// Core engine types
    Core,
    /// Engine servers
    Servers,
    /// Scene types; the default level for generated message classes
    #[default]
    Scene,
    /// Editor-only types
    Editor,
}

impl InitializationLevel {
    /// Name of the level constant in generated C++
    pub fn cpp_constant(&self) -> &'static str {
        match self {
            InitializationLevel::Core => "MODULE_INITIALIZATION_LEVEL_CORE",
            InitializationLevel::Servers => "MODULE_INITIALIZATION_LEVEL_SERVERS",
            InitializationLevel::Scene => "MODULE_INITIALIZATION_LEVEL_SCENE",
            InitializationLevel::Editor => "MODULE_INITIALIZATION_LEVEL_EDITOR",
        }
    }
}

impl std::fmt::Display for InitializationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitializationLevel::Core => write!(f, "core"),
            InitializationLevel::Servers => write!(f, "servers"),
            InitializationLevel::Scene => write!(f, "scene"),
            InitializationLevel::Editor => write!(f, "editor"),
        }
    }
}

impl FromStr for InitializationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "core" => Ok(InitializationLevel::Core),
            "servers" => Ok(InitializationLevel::Servers),
            "scene" => Ok(InitializationLevel::Scene),
            "editor" => Ok(InitializationLevel::Editor),
            other => Err(format!("unknown initialization level: {other}")),
        }
    }
}

#[cfg(test)]
#[path = "phase/phase_tests.rs"]
mod phase_tests;
