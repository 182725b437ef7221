//! Registration state machine

use serde::{Deserialize, Serialize};

/// Lifecycle of a generated class set inside the host
///
/// State transitions:
/// ```text
/// Pending → Registered → Terminated
///               ↑             │
///               └─────────────┘ (re-initialize)
///   Pending/Registered → Failed (host rejected a class)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    /// Nothing handed to the host yet
    #[default]
    Pending,
    /// Every class is registered
    Registered,
    /// The terminator ran at the registration level
    Terminated,
    /// The host rejected a class; no retry is attempted
    Failed,
}

impl RegistrationState {
    pub fn can_transition_to(&self, target: RegistrationState) -> bool {
        use RegistrationState::*;
        matches!(
            (self, target),
            (Pending, Registered)
                | (Registered, Terminated)
                | (Terminated, Registered)
                | (Pending, Failed)
                | (Registered, Failed)
        )
    }
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationState::Pending => write!(f, "Pending"),
            RegistrationState::Registered => write!(f, "Registered"),
            RegistrationState::Terminated => write!(f, "Terminated"),
            RegistrationState::Failed => write!(f, "Failed"),
        }
    }
}
