//! Output formatter trait

use workbench_application::{RunAgentError, RunAgentOutput};

/// Trait for formatting agent run results
pub trait OutputFormatter {
    /// Format the final answer with a run summary
    fn format(&self, output: &RunAgentOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &RunAgentOutput) -> String;

    /// Format a run that ended without an answer
    fn format_error(&self, error: &RunAgentError) -> String;
}
