//! Sandbox configuration from TOML (`[sandbox]` section)

use crate::tools::ScriptConfig;
use crate::tools::file::DEFAULT_MAX_READ_CHARS;
use crate::tools::script::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw sandbox configuration from TOML
///
/// # Example
///
/// ```toml
/// [sandbox]
/// root = "./calculator"       # defaults to the current directory
/// max_read_chars = 10000
///
/// [sandbox.script]
/// interpreter = "python3"
/// extension = "py"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSandboxConfig {
    /// Directory every tool is confined to
    pub root: Option<PathBuf>,
    /// Character cap for read_file
    pub max_read_chars: usize,
    /// run_script settings
    pub script: FileScriptConfig,
}

impl Default for FileSandboxConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_read_chars: DEFAULT_MAX_READ_CHARS,
            script: FileScriptConfig::default(),
        }
    }
}

/// Raw run_script configuration (`[sandbox.script]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScriptConfig {
    pub interpreter: String,
    /// Accepted with or without the leading dot
    pub extension: String,
    pub timeout_secs: u64,
}

impl Default for FileScriptConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            extension: "py".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FileScriptConfig {
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim().trim_start_matches('.')
    }

    pub fn to_script_config(&self) -> ScriptConfig {
        ScriptConfig {
            interpreter: self.interpreter.trim().to_string(),
            extension: self.normalized_extension().to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            hidden_env: Vec::new(),
        }
    }
}
