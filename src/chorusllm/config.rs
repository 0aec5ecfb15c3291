//! Configuration for chorusllm.
//!
//! [`ChorusConfig`] only changes which text goes into prompts and which role-selection
//! policy [`Orchestrator::from_config`](crate::Orchestrator::from_config) builds; it never
//! changes the pipeline's control flow. Construct it by hand, deserialize it with serde from
//! whatever format the application already uses, or read it from the environment.
//!
//! # Example
//!
//! ```rust
//! use chorusllm::config::{BudgetPolicy, ChorusConfig, ContextBudget, RoleSelectionStrategy};
//!
//! let config = ChorusConfig::default()
//!     .with_context("A mid-sized city council is deciding this.")
//!     .with_role_selection(RoleSelectionStrategy::ModelAssisted)
//!     .with_context_budget(ContextBudget::new(24_000, BudgetPolicy::DropOldest));
//!
//! assert_eq!(config.context_budget.unwrap().max_chars, 24_000);
//! ```

use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding free-text situational context.
pub const ENV_CONTEXT: &str = "CHORUS_CONTEXT";
/// Environment variable selecting the role-selection strategy (`static` or `model_assisted`).
pub const ENV_ROLE_STRATEGY: &str = "CHORUS_ROLE_STRATEGY";
/// Environment variable bounding prompt size in characters.
pub const ENV_MAX_CONTEXT_CHARS: &str = "CHORUS_MAX_CONTEXT_CHARS";

/// Which built-in role-selection policy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSelectionStrategy {
    /// Fixed pool of seed roles, no model call.
    #[default]
    Static,
    /// One preliminary model call, then keyword extraction from its reply.
    ModelAssisted,
}

impl RoleSelectionStrategy {
    /// Parse the values accepted by [`ENV_ROLE_STRATEGY`].
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "static" | "fixed" => Some(RoleSelectionStrategy::Static),
            "model_assisted" | "model" | "keyword" => Some(RoleSelectionStrategy::ModelAssisted),
            _ => None,
        }
    }
}

/// What to do when a prompt exceeds [`ContextBudget::max_chars`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// Fail the run with `ContextBudgetExceeded`.
    #[default]
    Reject,
    /// Drop the oldest prior analyses from the transcript, leaving an omission marker.
    DropOldest,
}

/// Upper bound on the size of specialist and synthesis prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    /// Maximum prompt length in characters.
    pub max_chars: usize,
    pub policy: BudgetPolicy,
}

impl ContextBudget {
    pub fn new(max_chars: usize, policy: BudgetPolicy) -> Self {
        Self { max_chars, policy }
    }
}

/// Settings an orchestrator is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChorusConfig {
    /// Situational framing appended to generated prompts.
    pub context: Option<String>,
    pub role_selection: RoleSelectionStrategy,
    /// `None` keeps every prior analysis verbatim, however long the run gets.
    pub context_budget: Option<ContextBudget>,
}

impl ChorusConfig {
    /// Set the situational context (builder pattern).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the role-selection strategy (builder pattern).
    pub fn with_role_selection(mut self, strategy: RoleSelectionStrategy) -> Self {
        self.role_selection = strategy;
        self
    }

    /// Bound prompt sizes (builder pattern).
    pub fn with_context_budget(mut self, budget: ContextBudget) -> Self {
        self.context_budget = Some(budget);
        self
    }

    /// Read configuration from `CHORUS_*` environment variables.
    ///
    /// Unset variables keep their defaults. Unparseable values are logged and ignored. A
    /// character limit read from the environment uses [`BudgetPolicy::DropOldest`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ChorusConfig::default();

        if let Some(context) = lookup(ENV_CONTEXT).filter(|c| !c.trim().is_empty()) {
            config.context = Some(context);
        }

        if let Some(raw) = lookup(ENV_ROLE_STRATEGY) {
            match RoleSelectionStrategy::parse(&raw) {
                Some(strategy) => config.role_selection = strategy,
                None => log::warn!("Ignoring unknown {} value '{}'", ENV_ROLE_STRATEGY, raw),
            }
        }

        if let Some(raw) = lookup(ENV_MAX_CONTEXT_CHARS) {
            match raw.trim().parse::<usize>() {
                Ok(max_chars) if max_chars > 0 => {
                    config.context_budget =
                        Some(ContextBudget::new(max_chars, BudgetPolicy::DropOldest));
                }
                _ => log::warn!("Ignoring invalid {} value '{}'", ENV_MAX_CONTEXT_CHARS, raw),
            }
        }

        config
    }
}
