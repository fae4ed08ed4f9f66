//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of the tool pipeline.
//! Every tool execution produces a [`ToolResult`], either a success payload
//! or a [`ToolError`], with optional [`ToolResultMetadata`].
//!
//! Tool failures are data, not faults: they are appended to the
//! conversation so the decision engine can see them and correct course.

use serde::{Deserialize, Serialize};

/// Specific reason a tool call failed.
///
/// | Kind | Category |
/// |------|----------|
/// | `ContainmentViolation` | containment |
/// | `NotFound` | not found |
/// | `NotADirectory`, `NotRegularFile`, `WrongExtension` | wrong type |
/// | `InvalidArgument` | invalid argument |
/// | `ReadFailure`, `WriteFailure`, `DirectoryCreationFailure`, `ExecutionFailure`, `Cancelled` | execution |
/// | `Timeout` | timeout |
/// | `UnknownTool` | unknown tool |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorKind {
    ContainmentViolation,
    NotFound,
    NotADirectory,
    NotRegularFile,
    WrongExtension,
    InvalidArgument,
    ReadFailure,
    WriteFailure,
    DirectoryCreationFailure,
    ExecutionFailure,
    Timeout,
    UnknownTool,
    Cancelled,
}

/// Coarse failure taxonomy shown to users and used in transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    ContainmentViolation,
    NotFound,
    WrongType,
    InvalidArgument,
    ExecutionFailure,
    Timeout,
    UnknownTool,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::ContainmentViolation => "CONTAINMENT_VIOLATION",
            ToolErrorKind::NotFound => "NOT_FOUND",
            ToolErrorKind::NotADirectory => "NOT_A_DIRECTORY",
            ToolErrorKind::NotRegularFile => "NOT_REGULAR_FILE",
            ToolErrorKind::WrongExtension => "WRONG_EXTENSION",
            ToolErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ToolErrorKind::ReadFailure => "READ_FAILURE",
            ToolErrorKind::WriteFailure => "WRITE_FAILURE",
            ToolErrorKind::DirectoryCreationFailure => "DIRECTORY_CREATION_FAILURE",
            ToolErrorKind::ExecutionFailure => "EXECUTION_FAILURE",
            ToolErrorKind::Timeout => "TIMEOUT",
            ToolErrorKind::UnknownTool => "UNKNOWN_TOOL",
            ToolErrorKind::Cancelled => "CANCELLED",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolErrorKind::ContainmentViolation => ErrorCategory::ContainmentViolation,
            ToolErrorKind::NotFound => ErrorCategory::NotFound,
            ToolErrorKind::NotADirectory
            | ToolErrorKind::NotRegularFile
            | ToolErrorKind::WrongExtension => ErrorCategory::WrongType,
            ToolErrorKind::InvalidArgument => ErrorCategory::InvalidArgument,
            ToolErrorKind::ReadFailure
            | ToolErrorKind::WriteFailure
            | ToolErrorKind::DirectoryCreationFailure
            | ToolErrorKind::ExecutionFailure
            | ToolErrorKind::Cancelled => ErrorCategory::ExecutionFailure,
            ToolErrorKind::Timeout => ErrorCategory::Timeout,
            ToolErrorKind::UnknownTool => ErrorCategory::UnknownTool,
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error that occurred during tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// What went wrong
    pub kind: ToolErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn containment_violation(path: impl AsRef<str>) -> Self {
        Self::new(
            ToolErrorKind::ContainmentViolation,
            format!(
                "Cannot access \"{}\" as it is outside the permitted working directory",
                path.as_ref()
            ),
        )
    }

    pub fn not_found(resource: impl AsRef<str>) -> Self {
        Self::new(
            ToolErrorKind::NotFound,
            format!("File not found: \"{}\"", resource.as_ref()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArgument, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ExecutionFailure, message)
    }

    pub fn timeout(operation: impl AsRef<str>) -> Self {
        Self::new(
            ToolErrorKind::Timeout,
            format!("Operation timed out: {}", operation.as_ref()),
        )
    }

    pub fn unknown_tool(name: impl AsRef<str>) -> Self {
        Self::new(
            ToolErrorKind::UnknownTool,
            format!("Unknown function: {}", name.as_ref()),
        )
    }

    pub fn cancelled(operation: impl AsRef<str>) -> Self {
        Self::new(
            ToolErrorKind::Cancelled,
            format!("Operation cancelled: {}", operation.as_ref()),
        )
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Outcome of a single tool call: a payload or an error descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { output: String },
    Failure { error: ToolError },
}

/// Result of a tool execution.
///
/// Always produced, even when the tool could not run; the executor never
/// lets a fault escape past this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool as it was requested
    pub tool_name: String,
    /// Provider-assigned id of the originating call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    /// Payload or error
    pub outcome: ToolOutcome,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
///
/// | Tool | `duration_ms` | `bytes` | `path` | `exit_code` | `entry_count` |
/// |------|:---:|:---:|:---:|:---:|:---:|
/// | `list_directory` | yes | - | yes | - | yes |
/// | `read_file` | yes | yes | yes | - | - |
/// | `write_file` | yes | yes | yes | - | - |
/// | `run_script` | yes | yes | yes | yes | - |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of bytes processed/returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    /// For file operations: the affected path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// For script execution: exit code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// For directory listings: number of entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_count: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            call_id: None,
            outcome: ToolOutcome::Success {
                output: output.into(),
            },
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            call_id: None,
            outcome: ToolOutcome::Failure { error },
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Attach the id of the call this result answers
    pub fn with_call_id(mut self, call_id: Option<String>) -> Self {
        self.call_id = call_id;
        self
    }

    /// Add metadata to the result
    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    /// Add path metadata
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.path = Some(path.into());
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success { .. })
    }

    /// Get the output content
    pub fn output(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Success { output } => Some(output),
            ToolOutcome::Failure { .. } => None,
        }
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        match &self.outcome {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Failure { error } => Some(error),
        }
    }

    /// Text fed back to the decision engine for this result
    pub fn as_feedback(&self) -> String {
        match &self.outcome {
            ToolOutcome::Success { output } => output.clone(),
            ToolOutcome::Failure { error } => format!("Error: {}", error),
        }
    }
}
