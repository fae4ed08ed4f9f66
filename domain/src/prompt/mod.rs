//! Prompt domain
//!
//! Built-in system instruction for the agent.

pub mod agent;

pub use agent::AgentPromptTemplate;
