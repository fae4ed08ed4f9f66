//! Run Agent use case
//!
//! Drives the conversation loop between the decision engine and the
//! sandboxed tools:
//!
//! ```text
//! user task ─▶ AwaitingModel ──(tool calls)──▶ ExecutingTools
//!                  │    ▲                          │
//!                  │    └──(results appended)──────┘
//!                  ├──(text only)──▶ Done
//!                  └──(error / budget / cancel)──▶ Failed
//! ```
//!
//! Every turn sends the full [`ConversationHistory`] plus the tool
//! declarations. The model's tool-call message is appended before the
//! results, and all results of one turn go into a single message in
//! request order.

mod types;

pub use types::{RunAgentError, RunAgentInput, RunAgentOutput};

use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::shared::{check_cancelled, send_with_tools_cancellable};
use crate::use_cases::tool_helpers::tool_args_preview;
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use workbench_domain::{
    AgentPhase, AgentState, ConversationHistory, DomainError, Message, TokenUsage, ToolCall,
    ToolError, ToolResult,
};

/// Use case for running the agent loop
pub struct RunAgentUseCase<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> {
    gateway: Arc<G>,
    tool_executor: Arc<T>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    progress: Arc<dyn AgentProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> Clone for RunAgentUseCase<G, T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            tool_schema: self.tool_schema.clone(),
            progress: self.progress.clone(),
            conversation_logger: self.conversation_logger.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> RunAgentUseCase<G, T> {
    pub fn new(gateway: Arc<G>, tool_executor: Arc<T>, tool_schema: Arc<dyn ToolSchemaPort>) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            progress: Arc::new(NoAgentProgress),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    /// Set the progress notifier
    pub fn with_progress(mut self, progress: Arc<dyn AgentProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    /// Set the conversation transcript logger
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run the agent until it produces a final answer or fails.
    pub async fn execute(&self, input: RunAgentInput) -> Result<RunAgentOutput, RunAgentError> {
        if input.task.trim().is_empty() {
            return Err(DomainError::EmptyTask.into());
        }

        let mut state = AgentState::new(input.params.max_turns);
        match self.run_loop(&input, &mut state).await {
            Ok(output) => {
                self.conversation_logger.log(ConversationEvent::new(
                    "agent_done",
                    json!({
                        "turns": output.turns,
                        "final_text": output.final_text,
                        "total_tokens": output.usage.total_tokens,
                    }),
                ));
                Ok(output)
            }
            Err(error) => {
                let kind = error.failure_kind();
                // A run can fail from any non-terminal phase
                if !state.phase().is_terminal() && state.fail(kind).is_ok() {
                    self.progress.on_phase_change(&AgentPhase::Failed);
                }
                warn!(kind = %kind, "Agent run failed: {}", error);
                self.progress.on_failed(kind, &error.to_string());
                self.conversation_logger.log(ConversationEvent::new(
                    "agent_failed",
                    json!({
                        "kind": kind.as_str(),
                        "error": error.to_string(),
                        "turns": state.turns().count(),
                    }),
                ));
                Err(error)
            }
        }
    }

    async fn run_loop(
        &self,
        input: &RunAgentInput,
        state: &mut AgentState,
    ) -> Result<RunAgentOutput, RunAgentError> {
        self.conversation_logger.log(ConversationEvent::new(
            "user_task",
            json!({ "task": input.task, "model": input.model.to_string() }),
        ));

        let session = self
            .gateway
            .create_session_with_system_prompt(&input.model, &input.system_prompt)
            .await?;
        let tools = self
            .tool_schema
            .all_tools_schema(self.tool_executor.tool_spec());

        let mut history = ConversationHistory::with_task(input.task.clone());
        let mut usage = TokenUsage::default();

        info!(
            model = %input.model,
            max_turns = input.params.max_turns,
            tools = tools.len(),
            "Starting agent run"
        );
        self.progress.on_phase_change(&AgentPhase::AwaitingModel);

        loop {
            check_cancelled(&self.cancellation_token)?;

            if !state.begin_turn() {
                return Err(RunAgentError::BudgetExhausted {
                    max_turns: state.turns().cap(),
                });
            }
            let turn = state.turns().count();
            self.progress.on_turn_start(turn, state.turns().cap());
            debug!(turn, messages = history.len(), "Sending conversation to model");

            let response = send_with_tools_cancellable(
                session.as_ref(),
                &history,
                &tools,
                &self.cancellation_token,
            )
            .await?;

            if let Some(turn_usage) = &response.usage {
                usage.accumulate(turn_usage);
                self.progress.on_usage(turn_usage, &usage);
            }

            let text = response.text_content();
            let calls = response.tool_calls();

            self.conversation_logger.log(ConversationEvent::new(
                "llm_response",
                json!({
                    "turn": turn,
                    "text": text,
                    "tool_calls": calls.iter().map(|c| c.tool_name.as_str()).collect::<Vec<_>>(),
                    "prompt_tokens": response.usage.map(|u| u.prompt_tokens),
                    "response_tokens": response.usage.map(|u| u.response_tokens),
                }),
            ));

            if calls.is_empty() {
                if text.trim().is_empty() {
                    return Err(RunAgentError::EmptyResponse);
                }
                history.push(Message::model_text(text.clone()));
                state.transition(AgentPhase::Done)?;
                self.progress.on_phase_change(&AgentPhase::Done);
                info!(turn, "Agent produced a final answer");

                return Ok(RunAgentOutput {
                    final_text: text,
                    turns: turn,
                    history,
                    usage,
                });
            }

            if !text.trim().is_empty() {
                self.progress.on_model_text(&text);
            }

            state.transition(AgentPhase::ExecutingTools)?;
            self.progress.on_phase_change(&AgentPhase::ExecutingTools);
            info!(turn, calls = calls.len(), "Executing tool calls");

            history.push(Message::model_tool_calls(Some(text), calls.clone()));
            let results = self
                .execute_tool_calls(&calls, input.params.parallel_tools)
                .await;
            history.push(Message::tool_results(results));

            state.transition(AgentPhase::AwaitingModel)?;
            self.progress.on_phase_change(&AgentPhase::AwaitingModel);
        }
    }

    /// Execute one turn's tool calls. Results come back in request order.
    async fn execute_tool_calls(&self, calls: &[ToolCall], parallel: bool) -> Vec<ToolResult> {
        if parallel {
            join_all(calls.iter().map(|call| self.execute_tool_call(call))).await
        } else {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                results.push(self.execute_tool_call(call).await);
            }
            results
        }
    }

    async fn execute_tool_call(&self, call: &ToolCall) -> ToolResult {
        self.progress
            .on_tool_call(&call.tool_name, &tool_args_preview(call));
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            json!({
                "tool": call.tool_name,
                "id": call.native_id,
                "args": call.arguments,
            }),
        ));

        if !self.tool_executor.has_tool(&call.tool_name) {
            self.progress
                .on_tool_not_found(&call.tool_name, &self.tool_executor.available_tools());
        }

        let result = match &self.cancellation_token {
            Some(token) if token.is_cancelled() => {
                ToolResult::failure(&call.tool_name, ToolError::cancelled(&call.tool_name))
                    .with_call_id(call.native_id.clone())
            }
            Some(token) => self.tool_executor.execute_cancellable(call, token).await,
            None => self.tool_executor.execute(call).await,
        };

        self.progress
            .on_tool_result(&call.tool_name, result.is_success());
        if let Some(error) = result.error() {
            self.progress
                .on_tool_error(&call.tool_name, error.category(), &error.message);
        }
        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            json!({
                "tool": call.tool_name,
                "id": result.call_id,
                "success": result.is_success(),
                "output": result.as_feedback(),
                "duration_ms": result.metadata.duration_ms,
            }),
        ));

        result
    }
}

#[cfg(test)]
mod tests;
