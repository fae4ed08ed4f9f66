//! Execution parameters: use case loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the
//! execution loop in [`RunAgentUseCase`](crate::use_cases::run_agent::RunAgentUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use workbench_domain::DEFAULT_MAX_TURNS;

/// Execution loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of decision engine round trips.
    pub max_turns: usize,
    /// Run the tool calls of one turn concurrently.
    pub parallel_tools: bool,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            parallel_tools: false,
        }
    }
}

impl ExecutionParams {
    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_parallel_tools(mut self, parallel: bool) -> Self {
        self.parallel_tools = parallel;
        self
    }
}
