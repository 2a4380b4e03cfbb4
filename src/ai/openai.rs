//! OpenAI-compatible chat backend.
//!
//! Works against api.openai.com or any endpoint speaking the chat completions
//! protocol (set `base_url` in the `[llm]` config section).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;
use crate::errors::{ServerError, ServerResult};

use super::ChatBackend;

/// OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API request message
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI API request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// OpenAI API response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

/// OpenAI API error
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

/// Chat backend over the OpenAI chat completions API.
pub struct OpenAiBackend {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiBackend {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_API_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, system: &str, input: &str) -> ServerResult<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| ServerError::ChatBackend {
            reason: "OPENAI_API_KEY not set".to_string(),
        })?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: input,
                },
            ],
            temperature: self.temperature,
        };

        debug!(model = %self.model, "Calling OpenAI-compatible API");
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServerError::ChatBackend {
                reason: format!("chat completions request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(ServerError::ChatBackend {
                    reason: format!("chat completions error: {}", error_response.error.message),
                });
            }
            return Err(ServerError::ChatBackend {
                reason: format!("chat completions error ({status}): {body}"),
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| ServerError::ChatBackend {
            reason: format!("failed to decode chat completions response: {e}"),
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(text)
    }
}
