//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// Console verbosity comes from `-v` / `RUST_LOG`; this section only
/// controls the JSONL conversation transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write a JSONL transcript of the run to this file
    pub conversation_log: Option<PathBuf>,
}
