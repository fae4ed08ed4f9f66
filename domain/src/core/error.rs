//! Domain error types

use crate::agent::AgentPhase;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: AgentPhase, to: AgentPhase },

    #[error("Task description cannot be empty")]
    EmptyTask,
}
