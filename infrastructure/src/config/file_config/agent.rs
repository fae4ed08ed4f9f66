//! Agent configuration from TOML (`[agent]` section)

use serde::{Deserialize, Serialize};
use workbench_application::ExecutionParams;
use workbench_domain::{AgentPromptTemplate, DEFAULT_MAX_TURNS, Model};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// model = "gemini-2.5-flash"
/// max_turns = 20
/// parallel_tools = false
/// system_prompt = "You are a helpful AI coding agent."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Decision engine model
    pub model: Model,
    /// Maximum decision engine calls per task
    pub max_turns: usize,
    /// Run one turn's tool calls concurrently
    pub parallel_tools: bool,
    /// Replaces the built-in system instruction when set
    pub system_prompt: Option<String>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            max_turns: DEFAULT_MAX_TURNS,
            parallel_tools: false,
            system_prompt: None,
        }
    }
}

impl FileAgentConfig {
    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_turns(self.max_turns)
            .with_parallel_tools(self.parallel_tools)
    }

    /// The configured system instruction, or the built-in one
    pub fn system_prompt(&self) -> String {
        match &self.system_prompt {
            Some(prompt) if !prompt.trim().is_empty() => prompt.clone(),
            _ => AgentPromptTemplate::system_prompt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_params() {
        let config = FileAgentConfig {
            max_turns: 7,
            parallel_tools: true,
            ..Default::default()
        };
        let params = config.execution_params();
        assert_eq!(params.max_turns, 7);
        assert!(params.parallel_tools);
    }

    #[test]
    fn test_blank_system_prompt_falls_back() {
        let config = FileAgentConfig {
            system_prompt: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.system_prompt(), AgentPromptTemplate::system_prompt());
    }
}
