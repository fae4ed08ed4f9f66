//! Gemini gateway
//!
//! Owns the shared HTTP client and credentials; hands out one
//! [`GeminiSession`] per agent run.

use super::session::GeminiSession;
use crate::config::FileGeminiConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};
use workbench_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use workbench_domain::Model;

pub struct GeminiLlmGateway {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiLlmGateway {
    /// Create a gateway with an explicit key, endpoint and request timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Create a gateway from the `[providers.gemini]` section.
    ///
    /// Fails with `AuthenticationError` when no API key can be found.
    pub fn from_config(config: &FileGeminiConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GatewayError::AuthenticationError(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;

        let gateway = Self::new(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        info!(base_url = %gateway.base_url, "Gemini provider initialized");
        Ok(gateway)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl LlmGateway for GeminiLlmGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        if model.as_str().trim().is_empty() {
            return Err(GatewayError::ModelNotAvailable(
                "model name is empty".to_string(),
            ));
        }
        if !model.is_gemini() {
            warn!(model = %model, "Model name does not look like a Gemini model");
        }

        Ok(Box::new(GeminiSession::new(
            self.client.clone(),
            &self.base_url,
            self.api_key.clone(),
            model.clone(),
            system_prompt.to_string(),
        )))
    }
}
