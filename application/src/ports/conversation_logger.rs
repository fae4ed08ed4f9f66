//! Run transcript port.
//!
//! The agent loop reports each step of a run as a [`ConversationEvent`]:
//!
//! | `event_type`    | recorded when                                  |
//! |-----------------|------------------------------------------------|
//! | `user_task`     | the run starts, with the task and model        |
//! | `llm_response`  | the decision engine answers a turn             |
//! | `tool_call`     | a requested tool is about to run               |
//! | `tool_result`   | that tool has produced its result envelope     |
//! | `agent_done`    | the run ends with a final answer               |
//! | `agent_failed`  | the run ends with a failure kind               |
//!
//! `tracing` carries diagnostics for people watching the terminal. This
//! transcript is for replaying a run afterwards, so every record is a
//! self-contained JSON object.

use serde_json::Value;

/// One transcript record. Sequence numbers and timestamps belong to the
/// adapter that writes it.
pub struct ConversationEvent {
    /// One of the names in the module table above.
    pub event_type: &'static str,
    /// Fields for this kind of record.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for transcript records.
///
/// Called inline from the agent loop, so `log` must not block for long and
/// cannot fail: a sink that loses its file drops records and the run goes on.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Sink used when no transcript was requested.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
