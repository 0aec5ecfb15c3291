//! The `OpenAIClient` struct implements `ClientWrapper` for OpenAI’s Chat API,
//! capturing both the assistant response and token usage (input vs output) so the
//! orchestrator can report how expensive a run was.
//!
//! # Example
//!
//! ```rust,no_run
//! use chorusllm::clients::openai::{OpenAIClient, Model};
//! use chorusllm::client_wrapper::ClientWrapper;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let secret_key = std::env::var("OPEN_AI_SECRET")?;
//!     let client = OpenAIClient::new_with_model_enum(&secret_key, Model::GPT41Nano);
//!
//!     let text = client.complete("Name one risk of prompt chaining.").await?;
//!     println!("Assistant: {}", text);
//!
//!     if let Some(usage) = client.get_last_usage().await {
//!         println!("Tokens: input: {}, output: {}", usage.input_tokens, usage.output_tokens);
//!     }
//!     Ok(())
//! }
//! ```
use std::sync::Arc;

use async_trait::async_trait;
use openai_rust2 as openai_rust;
use tokio::sync::Mutex;

use crate::client_wrapper::{BoxError, ClientWrapper, Message, MessageRole, TokenUsage};
use crate::clients::common::{get_shared_http_client, send_and_track, to_chat_messages};

/// Model identifiers supported by OpenAI's Chat Completions API.
pub enum Model {
    /// `gpt-5`
    GPT5,
    /// `gpt-5-mini`
    GPT5Mini,
    /// `gpt-5-nano`
    GPT5Nano,
    /// `gpt-4o` – Omni model with text + image inputs.
    GPT4o,
    /// `gpt-4o-mini` – cost effective GPT-4o derivative.
    GPT4oMini,
    /// `o3-mini`
    O3Mini,
    /// `o4-mini`
    O4Mini,
    /// `gpt-4.1` – general availability GPT-4.1.
    GPT41,
    /// `gpt-4.1-mini` – reduced cost GPT-4.1 tier.
    GPT41Mini,
    /// `gpt-4.1-nano` – ultra low cost GPT-4.1 derivative.
    GPT41Nano,
}

/// Convert a [`Model`] variant into the string identifier expected by the REST API.
pub fn model_to_string(model: Model) -> String {
    match model {
        Model::GPT5 => "gpt-5".to_string(),
        Model::GPT5Mini => "gpt-5-mini".to_string(),
        Model::GPT5Nano => "gpt-5-nano".to_string(),
        Model::GPT4o => "gpt-4o".to_string(),
        Model::GPT4oMini => "gpt-4o-mini".to_string(),
        Model::O3Mini => "o3-mini".to_string(),
        Model::O4Mini => "o4-mini".to_string(),
        Model::GPT41 => "gpt-4.1".to_string(),
        Model::GPT41Mini => "gpt-4.1-mini".to_string(),
        Model::GPT41Nano => "gpt-4.1-nano".to_string(),
    }
}

/// Client wrapper for OpenAI's Chat Completions API (and compatible endpoints).
///
/// Keeps the selected model identifier plus a [`TokenUsage`] slot holding the usage reported
/// by the most recent request. Reuses the pooled HTTP client from
/// [`common`](crate::clients::common).
pub struct OpenAIClient {
    /// Underlying SDK client pointing at the REST endpoint.
    client: openai_rust::Client,
    /// Model name that will be injected into each request.
    model: String,
    /// Storage for the token usage returned by the most recent request.
    token_usage: Mutex<Option<TokenUsage>>,
}

impl OpenAIClient {
    /// Construct a new client using the provided API key and [`Model`] variant.
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_string(secret_key, &model_to_string(model))
    }

    /// Construct a new client using the provided API key and explicit model name.
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client(
                secret_key,
                get_shared_http_client().clone(),
            ),
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }

    /// Construct a client targeting a custom OpenAI compatible base URL.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client_and_base_url(
                secret_key,
                get_shared_http_client().clone(),
                base_url,
            ),
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }
}

impl OpenAIClient {
    /// Send `messages` and return the reply text with the usage of this request.
    async fn send_tracked(&self, messages: &[Message]) -> Result<(String, TokenUsage), BoxError> {
        let formatted_messages = to_chat_messages(messages);
        log::debug!(
            "OpenAIClient::send_message(...): {} message(s) to {}",
            formatted_messages.len(),
            self.model
        );

        send_and_track(
            &self.client,
            &self.model,
            formatted_messages,
            Some("/v1/chat/completions".to_string()),
            &self.token_usage,
        )
        .await
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, BoxError> {
        let (content, _usage) = self.send_tracked(messages).await?;
        Ok(Message {
            role: MessageRole::Assistant,
            content: Arc::from(content.as_str()),
        })
    }

    async fn complete_with_usage(
        &self,
        prompt: &str,
    ) -> Result<(String, Option<TokenUsage>), BoxError> {
        let (content, usage) = self.send_tracked(&[Message::user(prompt)]).await?;
        Ok((content, Some(usage)))
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}
