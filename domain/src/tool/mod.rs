//! Tool domain module
//!
//! Defines how the agent acts on its sandbox: a closed set of
//! [`ToolKind`]s, their declarations, the calls the decision engine
//! requests, and the result envelope every call produces.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (envelope)   │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "get_file_content" → ReadFile
//!        └─ tools:   ReadFile → ToolDefinition
//! ```
//!
//! # Tool Name Aliases
//!
//! Models sometimes use older or invented names for tools. [`ToolSpec`]
//! keeps an alias table so those resolve without another round trip;
//! names that resolve to nothing become an `UNKNOWN_TOOL` result.
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`): port trait for tool execution
//! - **Infrastructure** (`LocalToolExecutor`): sandboxed file I/O and
//!   subprocess execution

pub mod entities;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolKind, ToolParameter, ToolSpec};
pub use value_objects::{ToolError, ToolErrorKind, ToolOutcome, ToolResult};
