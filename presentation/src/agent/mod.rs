//! Agent presentation components
//!
//! Progress reporting for the agent loop: a spinner-based reporter for
//! interactive terminals and a plain line-based one for pipes and logs.

pub mod progress;

pub use progress::{AgentProgressReporter, SimpleAgentProgress};
