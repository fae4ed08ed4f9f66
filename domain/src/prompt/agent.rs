//! Prompt templates for the agent

use crate::tool::entities::ToolSpec;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// Default system instruction sent with every request
    pub fn system_prompt() -> String {
        r#"You are a helpful AI coding agent.

When a user asks a question or makes a request, make a function call plan. You can perform the following operations:

- List files and directories
- Read file contents
- Write or overwrite files
- Execute scripts with optional arguments

All paths you provide should be relative to the working directory. You do not need to specify the working directory in your function calls as it is automatically injected for security reasons.

When you are finished, answer with a short summary of what you did and do not request any more function calls."#
            .to_string()
    }

    /// System instruction followed by a summary of the declared tools.
    ///
    /// Useful for models that do not surface function declarations in their
    /// reasoning.
    pub fn system_prompt_with_tools(tool_spec: &ToolSpec) -> String {
        let tool_descriptions = tool_spec
            .all()
            .map(|t| {
                let params = t
                    .parameters
                    .iter()
                    .map(|p| {
                        let required = if p.required { " (required)" } else { "" };
                        format!("    - {}: {}{}", p.name, p.description, required)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");

                if params.is_empty() {
                    format!("- **{}**: {}", t.name, t.description)
                } else {
                    format!("- **{}**: {}\n  Parameters:\n{}", t.name, t.description, params)
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{}\n\n## Available Tools\n\n{}",
            Self::system_prompt(),
            tool_descriptions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolDefinition, ToolKind, ToolParameter};

    #[test]
    fn test_system_prompt_mentions_relative_paths() {
        let prompt = AgentPromptTemplate::system_prompt();
        assert!(prompt.contains("relative to the working directory"));
    }

    #[test]
    fn test_system_prompt_with_tools() {
        let spec = ToolSpec::new().register(
            ToolDefinition::new(ToolKind::ReadFile, "Read a file").with_parameter(
                ToolParameter::new("path", "File to read", true),
            ),
        );
        let prompt = AgentPromptTemplate::system_prompt_with_tools(&spec);
        assert!(prompt.contains("- **read_file**: Read a file"));
        assert!(prompt.contains("    - path: File to read (required)"));
    }
}
