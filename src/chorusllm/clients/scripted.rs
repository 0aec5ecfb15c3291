//! Deterministic, network-free [`ClientWrapper`] for tests and offline demos.
//!
//! A [`ScriptedClient`] answers each prompt by walking its rules in insertion order and
//! applying the first one whose substring occurs in the prompt. When nothing matches, the
//! optional fallback function produces the reply; without a fallback the call fails. Every
//! prompt received is recorded so callers can inspect exactly what the orchestrator sent.
//!
//! ```rust
//! use chorusllm::clients::scripted::ScriptedClient;
//! use chorusllm::client_wrapper::ClientWrapper;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = ScriptedClient::new("stub")
//!     .reply_when("ethics", "Consider consent.")
//!     .with_fallback(|prompt| prompt.len().to_string());
//!
//! assert_eq!(client.complete("an ethics question").await.unwrap(), "Consider consent.");
//! assert_eq!(client.complete("abc").await.unwrap(), "3");
//! assert_eq!(client.call_count(), 2);
//! # }
//! ```

use crate::client_wrapper::{BoxError, ClientWrapper, Message, MessageRole};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

type Fallback = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone, Debug)]
enum Outcome {
    Reply(String),
    Fail(String),
}

#[derive(Clone, Debug)]
struct Rule {
    needle: String,
    outcome: Outcome,
}

/// Stub client mapping prompt substrings to canned replies or failures.
pub struct ScriptedClient {
    model: String,
    rules: Vec<Rule>,
    fallback: Option<Fallback>,
    call_count: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    /// Create a client with no rules and no fallback.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            rules: Vec::new(),
            fallback: None,
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `reply` whenever the prompt contains `needle` (builder pattern).
    pub fn reply_when(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            outcome: Outcome::Reply(reply.into()),
        });
        self
    }

    /// Fail with `error` whenever the prompt contains `needle` (builder pattern).
    pub fn fail_when(mut self, needle: impl Into<String>, error: impl Into<String>) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            outcome: Outcome::Fail(error.into()),
        });
        self
    }

    /// Produce the reply from the prompt itself when no rule matches (builder pattern).
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Number of `send_message` calls received so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every prompt received, in arrival order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    fn answer(&self, prompt: &str) -> Result<String, BoxError> {
        if let Some(rule) = self.rules.iter().find(|r| prompt.contains(&r.needle)) {
            return match &rule.outcome {
                Outcome::Reply(text) => Ok(text.clone()),
                Outcome::Fail(error) => Err(error.clone().into()),
            };
        }
        match &self.fallback {
            Some(fallback) => Ok(fallback(prompt)),
            None => Err(format!("no scripted reply for prompt of {} chars", prompt.len()).into()),
        }
    }
}

#[async_trait]
impl ClientWrapper for ScriptedClient {
    async fn send_message(&self, messages: &[Message]) -> Result<Message, BoxError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.to_string())
            .unwrap_or_default();
        self.prompts.lock().await.push(prompt.clone());

        let reply = self.answer(&prompt)?;
        Ok(Message::assistant(reply))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_matching_rule_wins() {
        let client = ScriptedClient::new("stub")
            .reply_when("alpha", "first")
            .reply_when("alp", "second");
        assert_eq!(client.complete("alpha beta").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn failure_rules_and_missing_fallback_error() {
        let client = ScriptedClient::new("stub").fail_when("boom", "quota exceeded");
        let err = client.complete("boom").await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
        assert!(client.complete("anything else").await.is_err());
        assert_eq!(client.call_count(), 2);
        assert_eq!(client.prompts().await, vec!["boom", "anything else"]);
    }
}
