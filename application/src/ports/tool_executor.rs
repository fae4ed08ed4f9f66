//! Tool Executor port
//!
//! Defines the interface for executing sandboxed tools.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use workbench_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
///
/// `execute` never fails: every outcome, including unknown tools and
/// internal faults, comes back as a [`ToolResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available (canonical name or alias)
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().resolve(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get_resolved(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute a tool call asynchronously
    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// Execute a tool call, aborting in-flight work when `token` fires.
    ///
    /// The default implementation ignores the token.
    async fn execute_cancellable(&self, call: &ToolCall, _token: &CancellationToken) -> ToolResult {
        self.execute(call).await
    }
}
