//! Anthropic Claude client wrapper built on the OpenAI-compatible transport.
//!
//! The wrapper delegates HTTP concerns to [`OpenAIClient`], so swapping the model behind an
//! orchestrator from OpenAI to Claude only requires a different constructor.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chorusllm::clients::claude::{ClaudeClient, Model};
//! use chorusllm::Orchestrator;
//!
//! let key = std::env::var("ANTHROPIC_KEY").unwrap_or_default();
//! let orchestrator = Orchestrator::new(Arc::new(ClaudeClient::new_with_model_enum(
//!     &key,
//!     Model::ClaudeSonnet45,
//! )));
//! ```

use crate::client_wrapper::{BoxError, ClientWrapper, Message, TokenUsage};
use crate::clients::openai::OpenAIClient;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Client wrapper for Anthropic's Claude API routed through the OpenAI compatible surface.
pub struct ClaudeClient {
    /// Delegated client that handles the HTTP interactions.
    delegate_client: OpenAIClient,
    /// Exposed model name.
    model: String,
}

/// Anthropic Claude models available through the compatibility layer.
pub enum Model {
    /// `claude-opus-4-1`
    ClaudeOpus41,
    /// `claude-sonnet-4-5`
    ClaudeSonnet45,
    /// `claude-haiku-4-5`
    ClaudeHaiku45,
    /// `claude-sonnet-4-0`
    ClaudeSonnet4,
}

fn model_to_string(model: Model) -> String {
    match model {
        Model::ClaudeOpus41 => "claude-opus-4-1".to_string(),
        Model::ClaudeSonnet45 => "claude-sonnet-4-5".to_string(),
        Model::ClaudeHaiku45 => "claude-haiku-4-5".to_string(),
        Model::ClaudeSonnet4 => "claude-sonnet-4-0".to_string(),
    }
}

impl ClaudeClient {
    /// Create a client from an API key and strongly typed model variant.
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_str(secret_key, &model_to_string(model))
    }

    /// Create a client from an API key and explicit model string.
    pub fn new_with_model_str(secret_key: &str, model_name: &str) -> Self {
        Self::new_with_base_url(secret_key, model_name, "https://api.anthropic.com/v1")
    }

    /// Create a client pointing at a custom Claude-compatible base URL.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        ClaudeClient {
            // we reuse the OpenAIClient for Claude and delegate the calls to it
            delegate_client: OpenAIClient::new_with_base_url(secret_key, model_name, base_url),
            model: model_name.to_string(),
        }
    }
}

#[async_trait]
impl ClientWrapper for ClaudeClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, BoxError> {
        self.delegate_client.send_message(messages).await
    }

    async fn complete_with_usage(
        &self,
        prompt: &str,
    ) -> Result<(String, Option<TokenUsage>), BoxError> {
        self.delegate_client.complete_with_usage(prompt).await
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        self.delegate_client.usage_slot()
    }
}
