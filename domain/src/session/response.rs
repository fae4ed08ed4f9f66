//! Decision engine response types.
//!
//! A response is a list of content blocks mixing free text and tool-use
//! requests, plus optional usage counters. The orchestrator inspects
//! [`LlmResponse::tool_calls`] to decide whether the run is done.
//!
//! ```text
//! send_with_tools() → LlmResponse ─┬─ tool_calls() non-empty → execute tools
//!                                  └─ text_content() only    → final answer
//! ```

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single block of content within a model response.
///
/// # Examples
///
/// ```
/// use workbench_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::Text("Let me read that file.".to_string());
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     id: "call_0".to_string(),
///     name: "read_file".to_string(),
///     input: [("path".to_string(), serde_json::json!("main.py"))]
///         .into_iter().collect(),
///     signature: None,
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text(String),

    /// A tool use request from the model.
    ToolUse {
        /// Id for correlating the request with its result.
        id: String,
        /// Requested tool name. Not guaranteed to be a declared tool.
        name: String,
        /// Arguments as sent by the model.
        input: HashMap<String, serde_json::Value>,
        /// Opaque provider token echoed back when the call is replayed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
    },
}

impl ContentBlock {
    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `(id, name, input)` if this is a `ToolUse` block.
    pub fn as_tool_use(&self) -> Option<(&str, &str, &HashMap<String, serde_json::Value>)> {
        match self {
            ContentBlock::ToolUse {
                id, name, input, ..
            } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// The model wants tools executed.
    ToolUse,
    /// Hit the token limit; the response may be truncated.
    MaxTokens,
    /// Provider-specific stop reason.
    Other(String),
}

/// Token counters reported by the decision engine.
///
/// Surfaced to the user and accumulated per run; never used for control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub response_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, response_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            response_tokens,
            total_tokens: prompt_tokens + response_tokens,
        }
    }

    /// Add another usage report to this one.
    pub fn accumulate(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.response_tokens += other.response_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// A structured response from the decision engine.
///
/// # Examples
///
/// ```
/// use workbench_domain::session::response::{LlmResponse, ContentBlock, StopReason};
///
/// let response = LlmResponse::from_text("Done!");
/// assert_eq!(response.text_content(), "Done!");
/// assert!(!response.has_tool_calls());
///
/// let response = LlmResponse {
///     content: vec![ContentBlock::ToolUse {
///         id: "call_0".to_string(),
///         name: "list_directory".to_string(),
///         input: Default::default(),
///         signature: None,
///     }],
///     stop_reason: Some(StopReason::ToolUse),
///     model: None,
///     usage: None,
/// };
/// assert_eq!(response.tool_calls().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: Option<StopReason>,
    /// Model identifier (if returned by the API).
    pub model: Option<String>,
    /// Usage counters (if returned by the API).
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
            usage: None,
        }
    }

    /// Create a response requesting the given tool calls.
    pub fn from_tool_calls(calls: impl IntoIterator<Item = ToolCall>) -> Self {
        let content = calls
            .into_iter()
            .enumerate()
            .map(|(i, call)| ContentBlock::ToolUse {
                id: call.native_id.unwrap_or_else(|| format!("call_{}", i)),
                name: call.tool_name,
                input: call.arguments,
                signature: call.signature,
            })
            .collect();
        Self {
            content,
            stop_reason: Some(StopReason::ToolUse),
            model: None,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all `ToolUse` content blocks as `Vec<ToolCall>`, in order.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse {
                    id,
                    name,
                    input,
                    signature,
                } => Some(
                    ToolCall::from_native(id, name, input.clone())
                        .with_signature(signature.clone()),
                ),
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if the response contains any tool use requests.
    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}
