//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agent;
mod logging;
mod providers;
mod sandbox;

pub use agent::FileAgentConfig;
pub use logging::FileLoggingConfig;
pub use providers::{FileGeminiConfig, FileProvidersConfig};
pub use sandbox::{FileSandboxConfig, FileScriptConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration values that would make a run impossible
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    InvalidTimeout { field: &'static str },

    #[error("agent.max_turns cannot be 0")]
    ZeroTurnBudget,

    #[error("sandbox.max_read_chars cannot be 0")]
    ZeroReadCap,

    #[error("sandbox.script.interpreter cannot be empty")]
    EmptyInterpreter,

    #[error("sandbox.script.extension cannot be empty")]
    EmptyExtension,

    #[error("providers.gemini.api_key_env cannot be empty")]
    EmptyApiKeyEnv,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent loop settings
    pub agent: FileAgentConfig,
    /// Sandbox and tool settings
    pub sandbox: FileSandboxConfig,
    /// Decision engine provider settings
    pub providers: FileProvidersConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.agent.max_turns == 0 {
            return Err(ConfigValidationError::ZeroTurnBudget);
        }
        if self.sandbox.max_read_chars == 0 {
            return Err(ConfigValidationError::ZeroReadCap);
        }

        let script = &self.sandbox.script;
        if script.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout {
                field: "sandbox.script.timeout_secs",
            });
        }
        if script.interpreter.trim().is_empty() {
            return Err(ConfigValidationError::EmptyInterpreter);
        }
        if script.normalized_extension().is_empty() {
            return Err(ConfigValidationError::EmptyExtension);
        }

        let gemini = &self.providers.gemini;
        if gemini.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout {
                field: "providers.gemini.request_timeout_secs",
            });
        }
        if gemini.api_key_env.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiKeyEnv);
        }

        Ok(())
    }
}
