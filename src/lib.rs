//! # chorusllm
//!
//! chorusllm chains several specialist perspectives over a Large Language Model and then
//! integrates them. For each query it:
//!
//! 1. selects an ordered set of analytical roles (systems, ethics, risk, ...),
//! 2. asks the model to answer as each role in turn, feeding every specialist the complete
//!    text of all the analyses written before it,
//! 3. issues one final synthesis call over the whole transcript,
//! 4. credits the roles' usage counters and records the run.
//!
//! The crate provides layered abstractions for:
//!
//! * **Model access**: the [`ClientWrapper`] trait with OpenAI, Anthropic Claude and xAI Grok
//!   adapters, plus a deterministic [`clients::scripted::ScriptedClient`] for tests
//! * **Prompt construction**: [`prompt_builder::PromptBuilder`], pure and side-effect free,
//!   with an optional [`config::ContextBudget`] bounding prompt growth
//! * **Role selection**: the injectable [`role_selection::RoleSelectionPolicy`] trait with a
//!   fixed-table and a model-assisted keyword implementation
//! * **Orchestration**: [`Orchestrator`] driving runs and owning the
//!   [`roles::RoleRepository`] and [`history::RunHistory`]
//! * **Observability**: `log` records throughout plus [`event::EventHandler`] callbacks
//!
//! ## Getting Started
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chorusllm::clients::openai::{Model, OpenAIClient};
//! use chorusllm::orchestrator::{Orchestrator, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     chorusllm::init_logger();
//!
//!     let api_key = std::env::var("OPEN_AI_SECRET")?;
//!     let client = Arc::new(OpenAIClient::new_with_model_enum(&api_key, Model::GPT41Mini));
//!     let orchestrator = Orchestrator::new(client);
//!
//!     let run = orchestrator
//!         .run_query(
//!             "Should our town replace its bus fleet with electric buses?",
//!             &RunOptions::default().with_context("Town of 40,000 with a tight budget."),
//!         )
//!         .await?;
//!
//!     for analysis in &run.analyses {
//!         println!("## {}\n{}\n", analysis.role, analysis.text);
//!     }
//!     println!("## Synthesis\n{}", run.synthesis.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Swapping the Role-Selection Policy
//!
//! ```rust
//! use std::sync::Arc;
//! use chorusllm::clients::scripted::ScriptedClient;
//! use chorusllm::role_selection::StaticRoleSelection;
//! use chorusllm::roles::RoleLabel;
//! use chorusllm::Orchestrator;
//!
//! let client = Arc::new(ScriptedClient::new("stub"));
//! let orchestrator = Orchestrator::new(client).with_policy(Arc::new(StaticRoleSelection::new(vec![
//!     RoleLabel::new("systems_analyst", "Maps the whole system."),
//!     RoleLabel::new("risk_assessor", "Looks for what can go wrong."),
//! ])));
//! assert_eq!(orchestrator.policy_name(), "StaticRoleSelection");
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Applications embedding chorusllm can opt in to `RUST_LOG` driven diagnostics without
/// choosing a logging backend upfront.
///
/// ```rust
/// chorusllm::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `chorusllm` module.
pub mod chorusllm;

// Re-exporting key items for easier external access.
pub use chorusllm::client_wrapper;
pub use chorusllm::client_wrapper::{BoxError, ClientWrapper, Message, MessageRole, TokenUsage};
pub use chorusllm::clients;
pub use chorusllm::config;
pub use chorusllm::config::{BudgetPolicy, ChorusConfig, ContextBudget, RoleSelectionStrategy};
pub use chorusllm::error;
pub use chorusllm::error::{OrchestrationError, Phase};
pub use chorusllm::event;
pub use chorusllm::event::{EventHandler, OrchestrationEvent};
pub use chorusllm::history;
pub use chorusllm::history::{HistoryReport, RunHistory};
pub use chorusllm::orchestrator;
pub use chorusllm::orchestrator::{Orchestrator, RunOptions};
pub use chorusllm::prompt_builder;
pub use chorusllm::prompt_builder::PromptBuilder;
pub use chorusllm::role_selection;
pub use chorusllm::role_selection::{
    KeywordRoleSelection, RoleSelection, RoleSelectionPolicy, StaticRoleSelection,
};
pub use chorusllm::roles;
pub use chorusllm::roles::{Role, RoleLabel, RoleRepository};
pub use chorusllm::run;
pub use chorusllm::run::{Analysis, Run, RunMetadata};
