//! Presentation layer for workbench
//!
//! This crate contains the CLI definition, the console progress reporter
//! and the final-output formatter.

pub mod agent;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use agent::{AgentProgressReporter, SimpleAgentProgress};
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
