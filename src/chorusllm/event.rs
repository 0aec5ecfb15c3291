//! Orchestration event system.
//!
//! Provides a callback-based observability layer for runs. Implement [`EventHandler`] and
//! attach it with [`Orchestrator::with_event_handler`](crate::Orchestrator::with_event_handler)
//! to receive real-time notifications about:
//!
//! - **Run lifecycle**: start, successful completion, failure
//! - **Role selection**: which roles were chosen and by which policy
//! - **Specialist steps**: each model call starting, completing or failing
//! - **Synthesis**: the final integrative call
//!
//! # Event Flow (during a successful `run_query()`)
//!
//! ```text
//! RunStarted
//!   └─ RolesSelected
//!   └─ SpecialistStarted { index: 0 } → SpecialistCompleted { index: 0 }
//!   └─ SpecialistStarted { index: 1 } → SpecialistCompleted { index: 1 }
//!   └─ SynthesisStarted → SynthesisCompleted
//! RunCompleted
//! ```
//!
//! A failed model call emits `SpecialistFailed` or `SynthesisFailed`, followed by `RunFailed`.
//!
//! # Example
//!
//! ```rust,no_run
//! use chorusllm::event::{EventHandler, OrchestrationEvent};
//! use async_trait::async_trait;
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl EventHandler for Printer {
//!     async fn on_orchestration_event(&self, event: &OrchestrationEvent) {
//!         if let OrchestrationEvent::SpecialistCompleted { role, response_length, .. } = event {
//!             println!("{} answered with {} chars", role, response_length);
//!         }
//!     }
//! }
//! ```

use crate::client_wrapper::TokenUsage;
use async_trait::async_trait;
use uuid::Uuid;

/// Events emitted by the [`Orchestrator`](crate::Orchestrator) while driving a run.
///
/// Every variant carries the `run_id` so handlers shared across concurrent runs can tell them
/// apart.
#[derive(Debug, Clone)]
pub enum OrchestrationEvent {
    /// Emitted once, before role selection.
    RunStarted { run_id: Uuid, query: String },

    /// The policy returned its roles.
    RolesSelected {
        run_id: Uuid,
        policy: String,
        roles: Vec<String>,
    },

    /// Fired **before** a specialist's model call. The prompt is already fully built.
    SpecialistStarted {
        run_id: Uuid,
        index: usize,
        role: String,
        prompt_size: usize,
    },

    /// Fired after a specialist's model call returned.
    SpecialistCompleted {
        run_id: Uuid,
        index: usize,
        role: String,
        response_length: usize,
        tokens_used: Option<TokenUsage>,
    },

    /// A specialist's model call failed; the run is aborted.
    SpecialistFailed {
        run_id: Uuid,
        index: usize,
        role: String,
        error: String,
    },

    SynthesisStarted { run_id: Uuid, prompt_size: usize },

    SynthesisCompleted {
        run_id: Uuid,
        response_length: usize,
        tokens_used: Option<TokenUsage>,
    },

    /// The synthesis call failed; the run is aborted.
    SynthesisFailed { run_id: Uuid, error: String },

    /// The run was committed to the role repository and run history.
    RunCompleted {
        run_id: Uuid,
        specialist_count: usize,
        total_characters: usize,
        total_tokens: usize,
    },

    /// The run failed; nothing was recorded.
    RunFailed {
        run_id: Uuid,
        phase: String,
        error: String,
    },
}

/// Receives orchestration events. The default implementation is a no-op.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn on_orchestration_event(&self, _event: &OrchestrationEvent) {}
}
