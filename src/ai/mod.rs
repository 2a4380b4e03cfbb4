//! Chat backends.
//!
//! The server uses an auxiliary language model for exactly one job:
//! transforming a YAML manifest from the calling model into canonical
//! single-line JSON before `create`. Backends implement [`ChatBackend`];
//! which one is active is a configuration choice made once at startup.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::errors::{ServerError, ServerResult};

mod anthropic;
mod openai;

pub use anthropic::AnthropicBackend;
pub use openai::OpenAiBackend;

/// A chat model that takes a system prompt plus one user message and returns
/// freeform text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Backend name, e.g. "anthropic".
    fn name(&self) -> &'static str;

    /// Send the system prompt and user input; return the model's text.
    async fn complete(&self, system: &str, input: &str) -> ServerResult<String>;
}

/// Build the configured chat backend. API keys come from the provider's
/// environment variable (`ANTHROPIC_API_KEY` / `OPENAI_API_KEY`), checked
/// lazily on first use so a keyless process can still serve read-only tools.
pub fn create_chat_backend(config: &LlmConfig) -> ServerResult<Arc<dyn ChatBackend>> {
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicBackend::from_config(config))),
        "openai" => Ok(Arc::new(OpenAiBackend::from_config(config))),
        other => Err(ServerError::Config {
            reason: format!("unknown LLM provider '{other}' (expected 'anthropic' or 'openai')"),
        }),
    }
}

/// Strip a markdown code fence from model output, if present.
///
/// Models sometimes wrap JSON in ```json blocks despite instructions not to;
/// the payload inside the fence is what callers want to parse.
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped.strip_suffix("```").unwrap_or(stripped).trim()
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped.strip_suffix("```").unwrap_or(stripped).trim()
    } else {
        text
    }
}
