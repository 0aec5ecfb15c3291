use crate::client_wrapper::{BoxError, ClientWrapper, Message, TokenUsage};
use crate::clients::openai::OpenAIClient;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// xAI Grok through its OpenAI-compatible endpoint.
pub struct GrokClient {
    client: OpenAIClient,
    model: String,
}

pub enum Model {
    Grok3,
    Grok3Mini,
    Grok4,
    Grok4FastReasoning,
}

fn model_to_string(model: Model) -> String {
    match model {
        Model::Grok3 => "grok-3".to_string(),
        Model::Grok3Mini => "grok-3-mini".to_string(),
        Model::Grok4 => "grok-4".to_string(),
        Model::Grok4FastReasoning => "grok-4-fast-reasoning".to_string(),
    }
}

impl GrokClient {
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_str(secret_key, &model_to_string(model))
    }

    pub fn new_with_model_str(secret_key: &str, model_name: &str) -> Self {
        GrokClient {
            client: OpenAIClient::new_with_base_url(secret_key, model_name, "https://api.x.ai/v1"),
            model: model_name.to_string(),
        }
    }
}

#[async_trait]
impl ClientWrapper for GrokClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, BoxError> {
        self.client.send_message(messages).await
    }

    async fn complete_with_usage(
        &self,
        prompt: &str,
    ) -> Result<(String, Option<TokenUsage>), BoxError> {
        self.client.complete_with_usage(prompt).await
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        self.client.usage_slot()
    }
}
