use crate::client_wrapper::{BoxError, Message, MessageRole, TokenUsage};
use lazy_static::lazy_static;
use openai_rust::chat;
use openai_rust2 as openai_rust;
use std::time::Duration;
use tokio::sync::Mutex;

lazy_static! {
    /// One pooled HTTP client shared by every provider wrapper so connections, DNS lookups
    /// and TLS sessions are reused across specialist calls.
    static ref SHARED_HTTP_CLIENT: reqwest::Client = build_pooled_client();
}

fn build_pooled_client() -> reqwest::Client {
    reqwest::ClientBuilder::new()
        // Keep idle connections alive for 90 seconds
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        // Synthesis prompts can be long; give the provider time to answer
        .timeout(Duration::from_secs(300))
        .build()
        .unwrap_or_else(|err| {
            log::warn!(
                "chorusllm::clients::common: pooled HTTP client could not be built ({}), using defaults",
                err
            );
            reqwest::Client::new()
        })
}

/// Get the process-wide pooled HTTP client.
pub fn get_shared_http_client() -> &'static reqwest::Client {
    &SHARED_HTTP_CLIENT
}

/// Convert crate messages into the wire representation expected by openai_rust.
pub fn to_chat_messages(messages: &[Message]) -> Vec<chat::Message> {
    messages
        .iter()
        .map(|msg| chat::Message {
            role: match msg.role {
                MessageRole::System => "system".to_owned(),
                MessageRole::User => "user".to_owned(),
                MessageRole::Assistant => "assistant".to_owned(),
            },
            content: msg.content.to_string(),
        })
        .collect()
}

/// Send a chat request, record its usage, and return the assistant’s content together with
/// the usage reported for this request.
pub async fn send_and_track(
    api: &openai_rust::Client,
    model: &str,
    formatted_msgs: Vec<chat::Message>,
    url_path: Option<String>,
    usage_slot: &Mutex<Option<TokenUsage>>,
) -> Result<(String, TokenUsage), BoxError> {
    let chat_arguments = chat::ChatArguments::new(model, formatted_msgs);

    let response = api.create_chat(chat_arguments, url_path).await;

    match response {
        Ok(response) => {
            let usage = TokenUsage {
                input_tokens: response.usage.prompt_tokens as usize,
                output_tokens: response.usage.completion_tokens as usize,
                total_tokens: response.usage.total_tokens as usize,
            };

            // Store it for get_last_usage()
            *usage_slot.lock().await = Some(usage.clone());

            let choice = response
                .choices
                .first()
                .ok_or("provider returned no choices")?;
            Ok((choice.message.content.clone(), usage))
        }
        Err(err) => {
            log::error!(
                "chorusllm::clients::common::send_and_track(...): API Error: {}",
                err
            );
            Err(err.to_string().into())
        }
    }
}
