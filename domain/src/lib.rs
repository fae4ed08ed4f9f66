//! Domain layer for workbench
//!
//! This crate contains the core types of the sandboxed coding agent:
//! tool declarations and results, the conversation history fed back to
//! the decision engine, and the turn-bounded agent state machine.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! The agent can only act through a closed set of [`ToolKind`]s. Every call
//! produces a [`ToolResult`] value, success or failure, which is appended to
//! the [`ConversationHistory`] so the model can see and correct its mistakes.
//!
//! ## Turns
//!
//! A turn is one model round trip plus the tool executions it requests.
//! [`TurnCounter`] caps the number of turns; [`AgentState`] tracks the
//! phase transitions of a single run.

pub mod agent;
pub mod core;
pub mod prompt;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    AgentPhase, AgentState, FailureKind, TurnCounter,
    state::DEFAULT_MAX_TURNS,
};
pub use core::{error::DomainError, model::Model};
pub use prompt::AgentPromptTemplate;
pub use session::{
    entities::{ConversationHistory, Message, MessageContent, Role},
    response::{ContentBlock, LlmResponse, StopReason, TokenUsage},
};
pub use tool::{
    entities::{ToolCall, ToolDefinition, ToolKind, ToolParameter, ToolSpec},
    value_objects::{ErrorCategory, ToolError, ToolErrorKind, ToolOutcome, ToolResult, ToolResultMetadata},
};
