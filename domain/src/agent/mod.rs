//! Agent domain module
//!
//! Phase state machine and turn budget for a single agent run.

pub mod state;

pub use state::{AgentPhase, AgentState, FailureKind, TurnCounter};
