//! Gemini LLM session implementation
//!
//! Wraps `models/{model}:generateContent` to implement the `LlmSession`
//! trait. Holds no conversation state; the orchestrator owns the history.

use super::types;
use async_trait::async_trait;
use reqwest::Client;
use workbench_application::ports::llm_gateway::{GatewayError, LlmSession};
use workbench_domain::{ConversationHistory, LlmResponse, Model};
use tracing::debug;

pub struct GeminiSession {
    client: Client,
    model: Model,
    endpoint: String,
    api_key: String,
    system_prompt: String,
}

impl GeminiSession {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: String,
        model: Model,
        system_prompt: String,
    ) -> Self {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model.as_str()
        );
        Self {
            client,
            model,
            endpoint,
            api_key,
            system_prompt,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn convert_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send_with_tools(
        &self,
        history: &ConversationHistory,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        let request = types::build_request(&self.system_prompt, history, tools);

        debug!(
            model = %self.model,
            messages = history.len(),
            tools = tools.len(),
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(convert_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(convert_send_error)?;

        if !status.is_success() {
            return Err(types::convert_http_error(status.as_u16(), &body));
        }

        let parsed: types::GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let response = types::convert_response(parsed)?;
        debug!(
            blocks = response.content.len(),
            stop_reason = ?response.stop_reason,
            "Gemini response received"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(server: &MockServer) -> GeminiSession {
        GeminiSession::new(
            Client::new(),
            &format!("{}/", server.uri()),
            "test-key".to_string(),
            Model::Gemini25Flash,
            "system".to_string(),
        )
    }

    #[tokio::test]
    async fn test_send_with_tools_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": { "parts": [{ "text": "system" }] },
                "contents": [{ "role": "user", "parts": [{ "text": "list files" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [
                        { "functionCall": { "name": "list_directory", "args": { "directory": "." } } }
                    ]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 3 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let history = ConversationHistory::with_task("list files");
        let tools = vec![serde_json::json!({ "name": "list_directory" })];
        let response = session(&server)
            .send_with_tools(&history, &tools)
            .await
            .unwrap();

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "list_directory");
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }

    #[tokio::test]
    async fn test_http_error_maps_to_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "code": 401, "message": "API key missing" }
            })))
            .mount(&server)
            .await;

        let err = session(&server)
            .send_with_tools(&ConversationHistory::with_task("hi"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::AuthenticationError(ref m) if m.contains("API key missing")));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = session(&server)
            .send_with_tools(&ConversationHistory::with_task("hi"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "candidates": [] }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let session = GeminiSession::new(
            client,
            &server.uri(),
            "k".to_string(),
            Model::Gemini25Flash,
            String::new(),
        );

        let err = session
            .send_with_tools(&ConversationHistory::with_task("hi"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Timeout));
    }

    #[test]
    fn test_endpoint_uses_model_id() {
        let session = GeminiSession::new(
            Client::new(),
            "https://example.test/",
            "k".to_string(),
            Model::Custom("gemini-exp".to_string()),
            String::new(),
        );
        assert_eq!(
            session.endpoint(),
            "https://example.test/v1beta/models/gemini-exp:generateContent"
        );
    }
}
