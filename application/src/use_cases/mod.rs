//! Use cases (application services)
//!
//! Use cases orchestrate domain logic and coordinate with ports.

pub mod run_agent;
pub(crate) mod shared;
pub(crate) mod tool_helpers;
