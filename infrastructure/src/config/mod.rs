//! Configuration file loading for workbench
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Command-line flags (applied by the binary)
//! 2. Environment: `WORKBENCH_<SECTION>__<KEY>`
//! 3. `--config <path>` specified file
//! 4. Project root: `./workbench.toml` or `./.workbench.toml`
//! 5. Global: `~/.config/workbench/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileConfig, FileGeminiConfig, FileLoggingConfig,
    FileProvidersConfig, FileSandboxConfig, FileScriptConfig,
};
pub use loader::{ConfigLoader, ConfigSource};
