//! Local tool executor: the concrete implementation of [`ToolExecutorPort`].
//!
//! [`LocalToolExecutor`] bridges the application layer's abstract
//! [`ToolExecutorPort`] with sandboxed file I/O and script execution.
//!
//! # Execution Path
//!
//! ```text
//! ToolExecutorPort::execute(call)
//!   ├─ strip reserved arguments (working_directory, sandbox_root)
//!   ├─ resolve name via ToolSpec (canonical or alias)
//!   │    └─ unresolved → UNKNOWN_TOOL result
//!   ├─ match ToolKind → handler(PathGuard, call)
//!   └─ panic in handler → EXECUTION_FAILURE result
//! ```
//!
//! The sandbox root is injected here and never read from the call.

use super::file::{self, DEFAULT_MAX_READ_CHARS};
use super::script::{self, ScriptConfig};
use crate::sandbox::{PathGuard, SandboxRoot};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use workbench_application::ports::tool_executor::ToolExecutorPort;
use workbench_domain::tool::{
    entities::{ToolCall, ToolKind, ToolSpec},
    value_objects::{ToolError, ToolResult},
};

/// Arguments the decision engine may never set
pub const RESERVED_ARGS: &[&str] = &["working_directory", "sandbox_root"];

/// Executor that runs tools inside a sandbox on the local machine.
///
/// | Constructor | Tools |
/// |-------------|-------|
/// | [`new()`](Self::new) | The four built-in tools plus legacy aliases |
/// | [`with_tools()`](Self::with_tools) | Custom [`ToolSpec`] (testing / restricted setups) |
#[derive(Debug, Clone)]
pub struct LocalToolExecutor {
    /// Available tools
    tool_spec: ToolSpec,
    /// Containment boundary for every path argument
    guard: PathGuard,
    /// Character cap for read_file
    max_read_chars: usize,
    /// Interpreter, extension and timeout for run_script
    script: ScriptConfig,
}

impl LocalToolExecutor {
    /// Create an executor with all built-in tools rooted at `root`.
    pub fn new(root: SandboxRoot) -> Self {
        let script = ScriptConfig::default();
        Self {
            tool_spec: super::default_tool_spec(&script),
            guard: PathGuard::new(root),
            max_read_chars: DEFAULT_MAX_READ_CHARS,
            script,
        }
    }

    /// Create an executor with a custom tool spec
    pub fn with_tools(root: SandboxRoot, tool_spec: ToolSpec) -> Self {
        Self {
            tool_spec,
            ..Self::new(root)
        }
    }

    /// Set the read_file character cap
    pub fn with_max_read_chars(mut self, max_chars: usize) -> Self {
        self.max_read_chars = max_chars;
        self
    }

    /// Set how scripts are run.
    ///
    /// The run_script declaration is refreshed so its description names the
    /// configured extension.
    pub fn with_script_config(mut self, script: ScriptConfig) -> Self {
        if self.tool_spec.get(ToolKind::RunScript).is_some() {
            self.tool_spec = self
                .tool_spec
                .register(script::run_script_definition(&script));
        }
        self.script = script;
        self
    }

    pub fn sandbox_root(&self) -> &SandboxRoot {
        self.guard.root()
    }

    async fn dispatch(
        &self,
        kind: ToolKind,
        call: &ToolCall,
        cancellation: Option<&CancellationToken>,
    ) -> ToolResult {
        match kind {
            ToolKind::ListDirectory => file::execute_list_directory(&self.guard, call),
            ToolKind::ReadFile => file::execute_read_file(&self.guard, call, self.max_read_chars),
            ToolKind::WriteFile => file::execute_write_file(&self.guard, call),
            ToolKind::RunScript => {
                script::execute_run_script(&self.guard, call, &self.script, cancellation).await
            }
        }
    }

    async fn run(&self, call: &ToolCall, cancellation: Option<&CancellationToken>) -> ToolResult {
        let start = Instant::now();

        let mut call = call.clone();
        let stripped = call.strip_reserved(RESERVED_ARGS);
        if !stripped.is_empty() {
            warn!(tool = %call.tool_name, ?stripped, "Ignoring reserved arguments from model");
        }

        let Some(kind) = self.tool_spec.resolve(&call.tool_name) else {
            debug!(tool = %call.tool_name, "Unknown tool requested");
            return ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name))
                .with_call_id(call.native_id.clone());
        };
        if kind.as_str() != call.tool_name {
            debug!(alias = %call.tool_name, tool = %kind, "Resolved tool alias");
        }

        let result = guarded(&call.tool_name, self.dispatch(kind, &call, cancellation)).await;
        debug!(
            tool = %kind,
            success = result.is_success(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Tool finished"
        );

        // Answer under the name the model used so it can match the result
        ToolResult {
            tool_name: call.tool_name.clone(),
            ..result
        }
        .with_call_id(call.native_id.clone())
        .with_duration(start.elapsed().as_millis() as u64)
    }
}

/// Run a handler future, turning a panic into an `EXECUTION_FAILURE` result.
pub(crate) async fn guarded<F>(tool_name: &str, handler: F) -> ToolResult
where
    F: Future<Output = ToolResult>,
{
    match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            warn!(tool = tool_name, panic = %message, "Tool handler panicked");
            ToolResult::failure(
                tool_name,
                ToolError::execution_failed(format!("Tool '{}' crashed: {}", tool_name, message)),
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.run(call, None).await
    }

    async fn execute_cancellable(&self, call: &ToolCall, token: &CancellationToken) -> ToolResult {
        self.run(call, Some(token)).await
    }
}
