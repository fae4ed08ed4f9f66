//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the final answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// The final answer with a short run summary
    #[default]
    Text,
    /// The final answer only
    Plain,
    /// JSON with the answer, usage and full conversation
    Json,
}

/// CLI arguments for workbench
#[derive(Parser, Debug)]
#[command(name = "workbench")]
#[command(author, version, about = "Sandboxed coding agent driven by a tool-calling LLM")]
#[command(long_about = r#"
Workbench hands a task to a decision engine (Gemini) that can list, read and
write files and run scripts, all confined to one sandbox directory.

The loop runs until the model answers without calling a tool, or until the
turn budget (default 20) is spent.

Configuration files are loaded from (in priority order):
1. WORKBENCH_<SECTION>__<KEY>              Environment overrides
2. --config <path>                         Explicit config file
3. ./workbench.toml                        Project-level config
4. ~/.config/workbench/config.toml         Global config

Exit codes: 0 done, 1 upstream or config failure, 2 turn budget exhausted,
130 cancelled.

Example:
  workbench --sandbox ./calculator "fix the bug: 3 + 7 * 2 shouldn't be 20"
  workbench -vv --max-turns 5 "what files are in the root?"
"#)]
pub struct Cli {
    /// The task for the agent (not required with --show-config)
    #[arg(required_unless_present = "show_config")]
    pub task: Option<String>,

    /// Directory the agent is confined to (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub sandbox: Option<PathBuf>,

    /// Decision engine model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum number of decision engine round trips
    #[arg(long, value_name = "N")]
    pub max_turns: Option<usize>,

    /// Run the tool calls of one turn concurrently
    #[arg(long)]
    pub parallel_tools: bool,

    /// Write a JSONL transcript of the run to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Tracing filter directive for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
