//! Console output formatter for agent results

use crate::cli::commands::OutputFormat;
use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use workbench_application::{RunAgentError, RunAgentOutput};
use workbench_domain::FailureKind;

/// Formats agent results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a finished run in the requested format
    pub fn render(output: &RunAgentOutput, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format(output),
            OutputFormat::Plain => Self::format_plain(output),
            OutputFormat::Json => Self::format_json(output),
        }
    }

    /// Final answer followed by a one-line run summary
    pub fn format(output: &RunAgentOutput) -> String {
        let mut text = String::new();

        text.push_str(&format!("{}\n", "Final response:".cyan().bold()));
        text.push_str(output.final_text.trim_end());
        text.push_str("\n\n");

        let tool_calls = output.history.tool_result_count();
        text.push_str(&format!(
            "{}\n",
            format!(
                "{} turn{}, {} tool call{}, {} tokens ({} prompt / {} response)",
                output.turns,
                plural(output.turns),
                tool_calls,
                plural(tool_calls),
                output.usage.total_tokens,
                output.usage.prompt_tokens,
                output.usage.response_tokens,
            )
            .dimmed()
        ));

        text
    }

    /// The final answer only, for piping
    pub fn format_plain(output: &RunAgentOutput) -> String {
        format!("{}\n", output.final_text.trim_end())
    }

    /// Format as JSON
    pub fn format_json(output: &RunAgentOutput) -> String {
        let value = serde_json::json!({
            "final_text": output.final_text,
            "turns": output.turns,
            "usage": output.usage,
            "history": output.history,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// One line describing why the run ended without an answer
    pub fn format_error(error: &RunAgentError) -> String {
        let label = match error.failure_kind() {
            FailureKind::UpstreamFailure => "Decision engine failed:".red().bold(),
            FailureKind::BudgetExhausted => "Turn budget exhausted:".yellow().bold(),
            FailureKind::Cancelled => "Cancelled:".yellow().bold(),
            FailureKind::Internal => "Internal error:".red().bold(),
        };
        format!("{} {}", label, error)
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &RunAgentOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &RunAgentOutput) -> String {
        Self::format_json(output)
    }

    fn format_error(&self, error: &RunAgentError) -> String {
        Self::format_error(error)
    }
}
