//! Agent execution progress port.
//!
//! [`AgentProgressNotifier`] is an **output port** that the presentation layer
//! implements to display real-time agent execution progress to the user.
//! All callback argument types come from the domain layer.
//!
//! # Example Implementation
//!
//! ```ignore
//! use workbench_application::ports::agent_progress::AgentProgressNotifier;
//!
//! struct MyProgress;
//!
//! impl AgentProgressNotifier for MyProgress {
//!     fn on_turn_start(&self, turn: usize, max_turns: usize) {
//!         println!("Turn {}/{}", turn, max_turns);
//!     }
//! }
//! ```

use workbench_domain::{AgentPhase, ErrorCategory, FailureKind, TokenUsage};

/// Progress notifier for agent execution.
///
/// All methods have default no-op implementations, so implementers only
/// need to override the callbacks they care about.
pub trait AgentProgressNotifier: Send + Sync {
    /// Called when the agent transitions to a new phase
    fn on_phase_change(&self, _phase: &AgentPhase) {}

    /// Called before each decision engine round trip (1-based turn)
    fn on_turn_start(&self, _turn: usize, _max_turns: usize) {}

    /// Called with any text the model sent in a response
    fn on_model_text(&self, _text: &str) {}

    /// Called with the usage counters of one response and the running total
    fn on_usage(&self, _turn: &TokenUsage, _total: &TokenUsage) {}

    /// Called when a tool is invoked
    fn on_tool_call(&self, _tool_name: &str, _args: &str) {}

    /// Called when a tool returns a result
    fn on_tool_result(&self, _tool_name: &str, _success: bool) {}

    /// Called when a tool execution fails with details about the error
    fn on_tool_error(&self, _tool_name: &str, _category: ErrorCategory, _message: &str) {}

    /// Called when a tool name is not declared
    fn on_tool_not_found(&self, _tool_name: &str, _available_tools: &[&str]) {}

    /// Called once when the run ends without a final answer
    fn on_failed(&self, _kind: FailureKind, _message: &str) {}
}

/// No-op progress notifier
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
