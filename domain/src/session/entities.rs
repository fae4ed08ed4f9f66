//! Conversation entities

use crate::session::response::ContentBlock;
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person who asked for the task
    User,
    /// The decision engine
    Model,
    /// Tool results produced by the executor
    Tool,
}

/// Content of a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    /// Free text
    Text { text: String },
    /// Tool calls requested by the model, with any text sent alongside
    ToolCalls {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        calls: Vec<ToolCall>,
    },
    /// Results of one turn's tool calls, in request order
    ToolResults { results: Vec<ToolResult> },
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text { text: text.into() },
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: MessageContent::Text { text: text.into() },
        }
    }

    pub fn model_tool_calls(text: Option<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Model,
            content: MessageContent::ToolCalls {
                text: text.filter(|t| !t.trim().is_empty()),
                calls,
            },
        }
    }

    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self {
            role: Role::Tool,
            content: MessageContent::ToolResults { results },
        }
    }

    /// Rebuild the content blocks of a model message.
    ///
    /// Used by adapters that replay model turns back to the provider.
    pub fn to_content_blocks(&self) -> Vec<ContentBlock> {
        match &self.content {
            MessageContent::Text { text } => vec![ContentBlock::Text(text.clone())],
            MessageContent::ToolCalls { text, calls } => text
                .iter()
                .map(|t| ContentBlock::Text(t.clone()))
                .chain(calls.iter().enumerate().map(|(i, call)| ContentBlock::ToolUse {
                    id: call
                        .native_id
                        .clone()
                        .unwrap_or_else(|| format!("call_{}", i)),
                    name: call.tool_name.clone(),
                    input: call.arguments.clone(),
                    signature: call.signature.clone(),
                }))
                .collect(),
            MessageContent::ToolResults { .. } => Vec::new(),
        }
    }
}

/// Ordered, append-only conversation transcript.
///
/// The only mutation is [`push`](Self::push); there is deliberately no way
/// to remove, reorder or truncate messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with the user's task
    pub fn with_task(task: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.push(Message::user(task));
        history
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of tool results recorded so far
    pub fn tool_result_count(&self) -> usize {
        self.messages
            .iter()
            .map(|m| match &m.content {
                MessageContent::ToolResults { results } => results.len(),
                _ => 0,
            })
            .sum()
    }
}
