use thiserror::Error;

use crate::core::assembly::LinkError;
use crate::core::chemistry::rules::Rejection;
use crate::core::models::ids::ComponentId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("Component not found: {0:?}")]
    ComponentNotFound(ComponentId),

    #[error("Cannot {action} while {mode} mode is active")]
    ModeConflict {
        action: &'static str,
        mode: &'static str,
    },

    #[error("No drag is in progress")]
    NoActiveDrag,

    #[error("Rotation mode is not active")]
    NotRotating,
}

impl EngineError {
    /// The chemistry rule behind this error, if it is a rejected connection.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            EngineError::Link(LinkError::Rejected(reason)) => Some(*reason),
            _ => None,
        }
    }
}

impl From<Rejection> for EngineError {
    fn from(reason: Rejection) -> Self {
        EngineError::Link(LinkError::Rejected(reason))
    }
}
