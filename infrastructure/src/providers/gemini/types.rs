//! Type conversions between the Gemini wire format and domain types
//!
//! Converts the conversation history into a `generateContent` request and
//! the response body into a domain `LlmResponse`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use workbench_application::ports::llm_gateway::GatewayError;
use workbench_domain::{
    ContentBlock, ConversationHistory, LlmResponse, Message, MessageContent, Role, StopReason,
    TokenUsage, ToolOutcome, ToolResult,
};

// ─── Wire format ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclarations>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    /// Set on reasoning summaries, which are not part of the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    /// Attached to function calls by thinking models; must be sent back as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclarations {
    pub function_declarations: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub model_version: Option<String>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

// ─── Domain → Gemini ─────────────────────────────────────────────

fn text_part(text: impl Into<String>) -> Part {
    Part {
        text: Some(text.into()),
        ..Default::default()
    }
}

/// Tool results travel back as `functionResponse` parts in a user turn.
pub fn convert_tool_result(result: &ToolResult) -> Part {
    let response = match &result.outcome {
        ToolOutcome::Success { output } => serde_json::json!({ "result": output }),
        ToolOutcome::Failure { error } => serde_json::json!({ "error": error.to_string() }),
    };
    Part {
        function_response: Some(FunctionResponse {
            name: result.tool_name.clone(),
            response,
        }),
        ..Default::default()
    }
}

pub fn convert_message(message: &Message) -> Content {
    let role = match message.role {
        Role::Model => "model",
        Role::User | Role::Tool => "user",
    };

    let parts = match &message.content {
        MessageContent::Text { text } => vec![text_part(text.as_str())],
        MessageContent::ToolCalls { text, calls } => text
            .iter()
            .map(|t| text_part(t.as_str()))
            .chain(calls.iter().map(|call| Part {
                function_call: Some(FunctionCall {
                    name: call.tool_name.clone(),
                    args: serde_json::Value::Object(
                        call.arguments
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect(),
                    ),
                }),
                thought_signature: call.signature.clone(),
                ..Default::default()
            }))
            .collect(),
        MessageContent::ToolResults { results } => {
            results.iter().map(convert_tool_result).collect()
        }
    };

    Content {
        role: Some(role.to_string()),
        parts,
    }
}

pub fn build_request(
    system_prompt: &str,
    history: &ConversationHistory,
    tools: &[serde_json::Value],
) -> GenerateContentRequest {
    let system_instruction = (!system_prompt.trim().is_empty()).then(|| Content {
        role: None,
        parts: vec![text_part(system_prompt)],
    });

    let tools = if tools.is_empty() {
        Vec::new()
    } else {
        vec![ToolDeclarations {
            function_declarations: tools.to_vec(),
        }]
    };

    GenerateContentRequest {
        system_instruction,
        contents: history.iter().map(convert_message).collect(),
        tools,
    }
}

// ─── Gemini → Domain ─────────────────────────────────────────────

pub fn convert_finish_reason(reason: &str) -> StopReason {
    match reason {
        "STOP" => StopReason::EndTurn,
        "MAX_TOKENS" => StopReason::MaxTokens,
        other => StopReason::Other(other.to_string()),
    }
}

/// Convert a parsed response body to a domain [`LlmResponse`].
///
/// Function calls get turn-local ids `call_0`, `call_1`, ... in the order
/// they appear.
pub fn convert_response(
    response: GenerateContentResponse,
) -> Result<LlmResponse, GatewayError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!(" (prompt blocked: {})", r))
            .unwrap_or_default();
        return Err(GatewayError::InvalidResponse(format!(
            "No candidates in response{}",
            reason
        )));
    };

    let mut content = Vec::new();
    let mut call_index = 0;
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(call) = part.function_call {
            let input: HashMap<String, serde_json::Value> = match call.args {
                serde_json::Value::Object(map) => map.into_iter().collect(),
                _ => HashMap::new(),
            };
            content.push(ContentBlock::ToolUse {
                id: format!("call_{}", call_index),
                name: call.name,
                input,
                signature: part.thought_signature,
            });
            call_index += 1;
        } else if let Some(text) = part.text
            && part.thought != Some(true)
            && !text.is_empty()
        {
            content.push(ContentBlock::Text(text));
        }
    }

    let stop_reason = if call_index > 0 {
        Some(StopReason::ToolUse)
    } else {
        candidate.finish_reason.as_deref().map(convert_finish_reason)
    };

    Ok(LlmResponse {
        content,
        stop_reason,
        model: response.model_version,
        usage: response
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count)),
    })
}

/// Map a non-success HTTP status to a [`GatewayError`].
///
/// Gemini wraps failures as `{"error": {"message": ...}}`; the message is
/// used when present.
pub fn convert_http_error(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    let message = format!("HTTP {}: {}", status, message);

    match status {
        401 | 403 => GatewayError::AuthenticationError(message),
        404 => GatewayError::ModelNotAvailable(message),
        408 | 504 => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workbench_domain::{ToolCall, ToolError};

    fn parse(body: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_build_request_shape() {
        let mut history = ConversationHistory::with_task("fix the calculator");
        history.push(Message::model_tool_calls(
            Some("Let me look.".to_string()),
            vec![ToolCall::from_native("call_0", "read_file", HashMap::new())
                .with_arg("path", "main.py")],
        ));
        history.push(Message::tool_results(vec![
            ToolResult::success("read_file", "print(1)"),
        ]));
        let tools = vec![serde_json::json!({ "name": "read_file" })];

        let request = build_request("be careful", &history, &tools);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be careful");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["tools"][0]["functionDeclarations"][0]["name"], "read_file");

        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "fix the calculator");

        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Let me look.");
        assert_eq!(contents[1]["parts"][1]["functionCall"]["name"], "read_file");
        assert_eq!(contents[1]["parts"][1]["functionCall"]["args"]["path"], "main.py");

        assert_eq!(contents[2]["role"], "user");
        let response = &contents[2]["parts"][0]["functionResponse"];
        assert_eq!(response["name"], "read_file");
        assert_eq!(response["response"]["result"], "print(1)");
    }

    #[test]
    fn test_failed_tool_result_is_error_response() {
        let result = ToolResult::failure("get_file_content", ToolError::not_found("x.py"));
        let part = convert_tool_result(&result);
        let response = part.function_response.unwrap();

        assert_eq!(response.name, "get_file_content");
        assert!(response.response.get("result").is_none());
        assert!(
            response.response["error"]
                .as_str()
                .unwrap()
                .contains("File not found")
        );
    }

    #[test]
    fn test_empty_tools_omitted() {
        let request = build_request("", &ConversationHistory::with_task("hi"), &[]);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_convert_text_response() {
        let response = convert_response(parse(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "All fixed." }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 8 },
            "modelVersion": "gemini-2.5-flash"
        })))
        .unwrap();

        assert_eq!(response.text_content(), "All fixed.");
        assert!(!response.has_tool_calls());
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(response.usage, Some(TokenUsage::new(120, 8)));
    }

    #[test]
    fn test_convert_function_calls_get_ordered_ids() {
        let response = convert_response(parse(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [
                    { "text": "thinking", "thought": true },
                    { "functionCall": { "name": "list_directory", "args": {} } },
                    { "functionCall": { "name": "read_file", "args": { "path": "a.py" } } }
                ]},
                "finishReason": "STOP"
            }]
        })))
        .unwrap();

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].native_id.as_deref(), Some("call_0"));
        assert_eq!(calls[0].tool_name, "list_directory");
        assert_eq!(calls[1].native_id.as_deref(), Some("call_1"));
        assert_eq!(calls[1].get_string("path"), Some("a.py"));
        assert_eq!(response.text_content(), "");
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_thought_signature_replayed_with_call() {
        let response = convert_response(parse(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{
                    "functionCall": { "name": "read_file", "args": { "path": "a.py" } },
                    "thoughtSignature": "c2lnbmF0dXJl"
                }]}
            }]
        })))
        .unwrap();

        let mut history = ConversationHistory::with_task("look at a.py");
        history.push(Message::model_tool_calls(None, response.tool_calls()));
        let json = serde_json::to_value(build_request("", &history, &[])).unwrap();

        let part = &json["contents"][1]["parts"][0];
        assert_eq!(part["functionCall"]["name"], "read_file");
        assert_eq!(part["thoughtSignature"], "c2lnbmF0dXJl");
        assert!(json["contents"][0]["parts"][0].get("thoughtSignature").is_none());
    }

    #[test]
    fn test_no_candidates_is_error() {
        let err = convert_response(parse(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .unwrap_err();

        match err {
            GatewayError::InvalidResponse(msg) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_convert_http_error() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid"}}"#;
        match convert_http_error(403, body) {
            GatewayError::AuthenticationError(msg) => assert!(msg.contains("API key not valid")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(matches!(
            convert_http_error(404, "not found"),
            GatewayError::ModelNotAvailable(_)
        ));
        assert!(matches!(convert_http_error(504, ""), GatewayError::Timeout));
        assert!(matches!(
            convert_http_error(500, "boom"),
            GatewayError::RequestFailed(_)
        ));
    }
}
