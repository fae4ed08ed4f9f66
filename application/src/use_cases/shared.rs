//! Shared utilities for use cases.
//!
//! Cancellation checking and the cancellable decision engine call used by
//! the agent loop.

use crate::ports::llm_gateway::LlmSession;
use crate::use_cases::run_agent::RunAgentError;
use workbench_domain::{ConversationHistory, LlmResponse};
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunAgentError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunAgentError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunAgentError::Cancelled);
    }
    Ok(())
}

/// Send the conversation with tools to the model, racing the cancellation token.
///
/// Returns the full `LlmResponse` with structured content blocks. A
/// cancellation while the request is in flight drops the request future.
pub(crate) async fn send_with_tools_cancellable(
    session: &dyn LlmSession,
    history: &ConversationHistory,
    tools: &[serde_json::Value],
    cancellation_token: &Option<CancellationToken>,
) -> Result<LlmResponse, RunAgentError> {
    check_cancelled(cancellation_token)?;

    let request = session.send_with_tools(history, tools);
    let response = match cancellation_token {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(RunAgentError::Cancelled),
                response = request => response,
            }
        }
        None => request.await,
    };

    response.map_err(RunAgentError::Gateway)
}
