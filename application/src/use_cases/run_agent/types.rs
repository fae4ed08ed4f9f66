//! Type definitions for the RunAgent use case.

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::GatewayError;
use thiserror::Error;
use workbench_domain::{
    AgentPromptTemplate, ConversationHistory, DomainError, FailureKind, Model, TokenUsage,
};

/// Errors that end an agent run without a final answer
#[derive(Error, Debug)]
pub enum RunAgentError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Model returned neither text nor tool calls")]
    EmptyResponse,

    #[error("Turn budget exhausted after {max_turns} turns without a final answer")]
    BudgetExhausted { max_turns: usize },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid agent state: {0}")]
    InvalidState(#[from] DomainError),
}

impl RunAgentError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunAgentError::Cancelled)
    }

    /// Classify the error for reporting and exit status.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            RunAgentError::Gateway(_) | RunAgentError::EmptyResponse => {
                FailureKind::UpstreamFailure
            }
            RunAgentError::BudgetExhausted { .. } => FailureKind::BudgetExhausted,
            RunAgentError::Cancelled => FailureKind::Cancelled,
            RunAgentError::InvalidState(_) => FailureKind::Internal,
        }
    }
}

/// Input for the RunAgent use case
#[derive(Debug, Clone)]
pub struct RunAgentInput {
    /// The user's task
    pub task: String,
    /// Model to drive the loop
    pub model: Model,
    /// System instruction sent with every request
    pub system_prompt: String,
    /// Loop control
    pub params: ExecutionParams,
}

impl RunAgentInput {
    pub fn new(task: impl Into<String>, model: Model) -> Self {
        Self {
            task: task.into(),
            model,
            system_prompt: AgentPromptTemplate::system_prompt(),
            params: ExecutionParams::default(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }
}

/// Output from a run that reached a final answer
#[derive(Debug, Clone)]
pub struct RunAgentOutput {
    /// The model's final text
    pub final_text: String,
    /// Number of decision engine round trips used
    pub turns: usize,
    /// Full conversation, ending with the final answer
    pub history: ConversationHistory,
    /// Usage accumulated over all turns
    pub usage: TokenUsage,
}
