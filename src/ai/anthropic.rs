//! Anthropic Claude chat backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;
use crate::errors::{ServerError, ServerResult};

use super::ChatBackend;

/// Anthropic API endpoint
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Generation ceiling; manifests are small
const MAX_TOKENS: u32 = 4096;

/// Anthropic API request
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Anthropic API response content block
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

/// Anthropic API response
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

/// Anthropic API error
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Anthropic API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

/// Claude chat backend over the Messages API.
pub struct AnthropicBackend {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl AnthropicBackend {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl ChatBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, system: &str, input: &str) -> ServerResult<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| ServerError::ChatBackend {
            reason: "ANTHROPIC_API_KEY not set".to_string(),
        })?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![RequestMessage {
                role: "user",
                content: input,
            }],
            temperature: self.temperature,
        };

        debug!(model = %self.model, "Calling Anthropic API");
        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ServerError::ChatBackend {
                reason: format!("Anthropic API request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(ServerError::ChatBackend {
                    reason: format!(
                        "Anthropic API error: {} - {}",
                        error_response.error.error_type, error_response.error.message
                    ),
                });
            }
            return Err(ServerError::ChatBackend {
                reason: format!("Anthropic API error ({status}): {body}"),
            });
        }

        let body: MessagesResponse =
            response.json().await.map_err(|e| ServerError::ChatBackend {
                reason: format!("failed to decode Anthropic response: {e}"),
            })?;

        let text: String = body
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect();
        Ok(text)
    }
}
