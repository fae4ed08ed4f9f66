//! Progress reporting for Agent execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use workbench_application::AgentProgressNotifier;
use workbench_domain::core::string::truncate;
use workbench_domain::{AgentPhase, ErrorCategory, FailureKind, TokenUsage};

/// Reports progress during Agent execution with a spinner per turn
pub struct AgentProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl AgentProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: false,
        }
    }

    /// Create with verbose output (shows model text and token usage)
    pub fn verbose() -> Self {
        Self {
            spinner: Mutex::new(None),
            verbose: true,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }

    /// Print above the spinner if one is running, otherwise to stdout
    fn println(&self, line: String) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.println(line);
            return;
        }
        println!("{}", line);
    }

    fn set_message(&self, message: String) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(message);
        }
    }
}

impl Default for AgentProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentProgressNotifier for AgentProgressReporter {
    fn on_phase_change(&self, phase: &AgentPhase) {
        match phase {
            AgentPhase::AwaitingModel => self.set_message("waiting for model...".to_string()),
            AgentPhase::ExecutingTools => self.set_message("running tools...".to_string()),
            AgentPhase::Done => {
                self.clear_spinner();
                println!("{} {}", "✓".green(), "Done".green().bold());
            }
            AgentPhase::Failed => self.clear_spinner(),
        }
    }

    fn on_turn_start(&self, turn: usize, max_turns: usize) {
        self.clear_spinner();

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Turn {}/{}", turn, max_turns));
        pb.set_message("waiting for model...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_model_text(&self, text: &str) {
        if self.verbose && !text.trim().is_empty() {
            self.println(format!("  {} {}", "💭".dimmed(), truncate(text.trim(), 200).dimmed()));
        }
    }

    fn on_usage(&self, turn: &TokenUsage, total: &TokenUsage) {
        if self.verbose {
            self.println(format!(
                "  {}",
                format!(
                    "tokens: {} prompt / {} response (total {})",
                    turn.prompt_tokens, turn.response_tokens, total.total_tokens
                )
                .dimmed()
            ));
        }
    }

    fn on_tool_call(&self, tool_name: &str, args: &str) {
        self.set_message(format!("Running: {}", tool_name));
        self.println(format!(
            "  {} {} {}",
            "→".blue(),
            tool_name.cyan(),
            truncate(args, 50).dimmed()
        ));
    }

    fn on_tool_result(&self, tool_name: &str, success: bool) {
        if self.verbose {
            if success {
                self.println(format!("    {} {} {}", "✓".green(), tool_name.green(), "OK".dimmed()));
            } else {
                self.println(format!("    {} {} {}", "✗".red(), tool_name.red(), "FAILED".dimmed()));
            }
        }
    }

    fn on_tool_error(&self, tool_name: &str, category: ErrorCategory, message: &str) {
        self.println(format!(
            "    {} {} {:?}: {}",
            "✗".red(),
            tool_name.red(),
            category,
            truncate(message, 120)
        ));
    }

    fn on_tool_not_found(&self, tool_name: &str, available_tools: &[&str]) {
        self.println(format!(
            "    {} unknown tool {} (available: {})",
            "✗".red(),
            tool_name.red().bold(),
            available_tools.join(", ")
        ));
    }

    fn on_failed(&self, kind: FailureKind, _message: &str) {
        self.clear_spinner();
        if self.verbose {
            eprintln!("{} run ended: {}", "✗".red(), kind);
        }
    }
}

/// Simple text-based progress (no spinners)
pub struct SimpleAgentProgress {
    verbose: bool,
}

impl SimpleAgentProgress {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl AgentProgressNotifier for SimpleAgentProgress {
    fn on_phase_change(&self, phase: &AgentPhase) {
        if phase.is_terminal() {
            println!("[{}]", phase);
        }
    }

    fn on_turn_start(&self, turn: usize, max_turns: usize) {
        println!("Turn {}/{}", turn, max_turns);
    }

    fn on_model_text(&self, text: &str) {
        if self.verbose && !text.trim().is_empty() {
            println!("  model: {}", truncate(text.trim(), 200));
        }
    }

    fn on_tool_call(&self, tool_name: &str, args: &str) {
        println!("  -> {} {}", tool_name, args);
    }

    fn on_tool_result(&self, tool_name: &str, success: bool) {
        if self.verbose {
            if success {
                println!("     ok {}", tool_name);
            } else {
                println!("     FAILED {}", tool_name);
            }
        }
    }

    fn on_tool_not_found(&self, tool_name: &str, _available_tools: &[&str]) {
        println!("     unknown tool {}", tool_name);
    }

    fn on_failed(&self, kind: FailureKind, _message: &str) {
        if self.verbose {
            eprintln!("run ended: {}", kind);
        }
    }
}
