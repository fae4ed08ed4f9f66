//! Infrastructure layer for workbench
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the sandbox and its tools, the Gemini
//! decision engine gateway, configuration file loading and the JSONL
//! conversation transcript.

pub mod config;
pub mod logging;
pub mod providers;
pub mod sandbox;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigSource, ConfigValidationError, FileAgentConfig, FileConfig,
    FileGeminiConfig, FileLoggingConfig, FileProvidersConfig, FileSandboxConfig, FileScriptConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::gemini::{GeminiLlmGateway, GeminiSession};
pub use sandbox::{ContainmentError, PathGuard, SandboxRoot};
pub use tools::{
    JsonSchemaToolConverter, LocalToolExecutor, ScriptConfig, default_tool_spec,
};
