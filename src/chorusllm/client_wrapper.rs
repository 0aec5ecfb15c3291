//! A ClientWrapper is a wrapper around a specific cloud LLM service.
//! It provides a common interface to interact with the LLMs.
//! It is stateless with respect to the conversation: every prompt the orchestrator sends is
//! self-contained, with all prior analyses already rendered into its text.

use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Boxed error type used at every model-client seam.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Represents the possible speakers of a chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageRole {
    System,
    // set by the developer to steer the model's responses
    User,
    // a message sent by a human user (or app user)
    Assistant, // lets the model know the content was generated as a response to a user message
}

/// How many tokens were spent on prompt vs. completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

/// Represents a generic message to be sent to an LLM.
#[derive(Clone, Debug)]
pub struct Message {
    /// The speaker associated with the message.
    pub role: MessageRole,
    /// The actual content of the message. Stored as `Arc<str>` so cloning is cheap.
    pub content: Arc<str>,
}

impl Message {
    /// Build a user message from any string-like value.
    pub fn user(content: impl AsRef<str>) -> Self {
        Message {
            role: MessageRole::User,
            content: Arc::from(content.as_ref()),
        }
    }

    /// Build a system message from any string-like value.
    pub fn system(content: impl AsRef<str>) -> Self {
        Message {
            role: MessageRole::System,
            content: Arc::from(content.as_ref()),
        }
    }

    /// Build an assistant message from any string-like value.
    pub fn assistant(content: impl AsRef<str>) -> Self {
        Message {
            role: MessageRole::Assistant,
            content: Arc::from(content.as_ref()),
        }
    }
}

/// Trait defining the interface to interact with various LLM services.
///
/// Implementations only need [`send_message`](ClientWrapper::send_message) and
/// [`model_name`](ClientWrapper::model_name); the single-prompt
/// [`complete`](ClientWrapper::complete) capability the orchestrator relies on is
/// provided on top of them.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use chorusllm::client_wrapper::{BoxError, ClientWrapper, Message};
///
/// struct Echo;
///
/// #[async_trait]
/// impl ClientWrapper for Echo {
///     async fn send_message(&self, messages: &[Message]) -> Result<Message, BoxError> {
///         let last = messages.last().ok_or("no messages")?;
///         Ok(Message::assistant(&*last.content))
///     }
///
///     fn model_name(&self) -> &str {
///         "echo"
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), BoxError> {
/// let reply = Echo.complete("ping").await?;
/// assert_eq!(reply, "ping");
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Send a message to the LLM and get a response.
    /// - `messages`: The messages to send in the request.
    async fn send_message(&self, messages: &[Message]) -> Result<Message, BoxError>;

    /// Identifier of the model behind this client, recorded in run metadata.
    fn model_name(&self) -> &str;

    /// Send one self-contained prompt as a single user message and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String, BoxError> {
        let reply = self.send_message(&[Message::user(prompt)]).await?;
        Ok(reply.content.to_string())
    }

    /// Like [`complete`](ClientWrapper::complete), but also returns the token usage of this
    /// very call.
    ///
    /// The default reads the shared usage slot after the reply arrives, which is only exact
    /// while no other call is in flight on the same client. Clients that know the usage of
    /// each response override this so concurrent runs never see each other's usage.
    async fn complete_with_usage(
        &self,
        prompt: &str,
    ) -> Result<(String, Option<TokenUsage>), BoxError> {
        let text = self.complete(prompt).await?;
        Ok((text, self.get_last_usage().await))
    }

    /// Hook to retrieve usage from the *last* send_message() call.
    /// Default impl returns None so wrappers without usage reporting don't break.
    async fn get_last_usage(&self) -> Option<TokenUsage> {
        match self.usage_slot() {
            Some(slot) => slot.lock().await.clone(),
            None => None,
        }
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        // ClientWrapper implementations supporting TokenUsage tracking should return a Mutex<Option<TokenUsage>> by overriding this method.
        None
    }
}
