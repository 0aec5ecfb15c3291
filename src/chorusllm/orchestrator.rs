//! Sequential multi-perspective orchestration.
//!
//! An [`Orchestrator`] answers a query in three phases:
//!
//! 1. **Role selection**: a [`RoleSelectionPolicy`] picks the ordered specialist roles.
//! 2. **Specialists**: each role, in order, receives a prompt carrying the full text of every
//!    earlier specialist's analysis and contributes its own. Strictly sequential: the prompt
//!    for specialist *i + 1* is only built once specialist *i*'s reply has arrived.
//! 3. **Synthesis**: one final call integrates all analyses.
//!
//! Only after all three succeed does the orchestrator credit the roles in its
//! [`RoleRepository`] and append the [`Run`] to its [`RunHistory`], both under a single lock.
//! Any failure aborts the run and leaves that state untouched; nothing is retried.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator
//!   ├─ ClientWrapper        (model calls; owned by the caller, shared via Arc)
//!   ├─ RoleSelectionPolicy  (static table, keyword heuristic, or your own)
//!   ├─ PromptBuilder        (pure prompt text, optional context budget)
//!   ├─ EventHandler         (optional observability callback)
//!   └─ Mutex<state>
//!        ├─ RoleRepository  (usage counts, dynamic roles)
//!        └─ RunHistory      (completed runs)
//! ```
//!
//! # Example
//!
//! ```rust
//! use chorusllm::clients::scripted::ScriptedClient;
//! use chorusllm::orchestrator::{Orchestrator, RunOptions};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), chorusllm::error::OrchestrationError> {
//! let client = Arc::new(ScriptedClient::new("stub").with_fallback(|_| "Noted.".to_string()));
//! let orchestrator = Orchestrator::new(client);
//!
//! let run = orchestrator
//!     .run_query("Should the library open on Sundays?", &RunOptions::default())
//!     .await?;
//!
//! assert_eq!(run.analyses.len(), 4);
//! assert_eq!(orchestrator.run_count().await, 1);
//! # Ok(())
//! # }
//! ```

use crate::client_wrapper::{BoxError, ClientWrapper};
use crate::config::{ChorusConfig, RoleSelectionStrategy};
use crate::error::OrchestrationError;
use crate::event::{EventHandler, OrchestrationEvent};
use crate::history::{HistoryReport, RunHistory};
use crate::prompt_builder::PromptBuilder;
use crate::role_selection::{KeywordRoleSelection, RoleSelectionPolicy, StaticRoleSelection};
use crate::roles::{normalize_role_name, Role, RoleLabel, RoleRepository, SYNTHESIS_ROLE};
use crate::run::{Analysis, Run, RunMetadata};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Per-call overrides for [`Orchestrator::run_query`].
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Situational framing for this run; replaces the orchestrator's configured context.
    pub context: Option<String>,
    /// Role-selection policy for this run; replaces the orchestrator's policy.
    pub policy: Option<Arc<dyn RoleSelectionPolicy>>,
}

impl RunOptions {
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn RoleSelectionPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// State shared by every run of one orchestrator.
struct OrchestratorState {
    roles: RoleRepository,
    history: RunHistory,
}

/// Drives runs from query to synthesis and keeps role and run accounting.
///
/// `run_query` takes `&self`, so independent queries may run concurrently on one instance;
/// the repository and history are only touched inside one lock at the end of a run.
pub struct Orchestrator {
    client: Arc<dyn ClientWrapper>,
    policy: Arc<dyn RoleSelectionPolicy>,
    prompt_builder: PromptBuilder,
    state: Mutex<OrchestratorState>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl Orchestrator {
    /// Create an orchestrator with the static seed-role policy, no context, no budget and a
    /// repository holding the seed roles.
    pub fn new(client: Arc<dyn ClientWrapper>) -> Self {
        Self {
            client,
            policy: Arc::new(StaticRoleSelection::default()),
            prompt_builder: PromptBuilder::new(),
            state: Mutex::new(OrchestratorState {
                roles: RoleRepository::with_seed_roles(),
                history: RunHistory::new(),
            }),
            event_handler: None,
        }
    }

    /// Create an orchestrator whose policy, context and budget come from `config`.
    pub fn from_config(client: Arc<dyn ClientWrapper>, config: &ChorusConfig) -> Self {
        let policy: Arc<dyn RoleSelectionPolicy> = match config.role_selection {
            RoleSelectionStrategy::Static => Arc::new(StaticRoleSelection::default()),
            RoleSelectionStrategy::ModelAssisted => {
                Arc::new(KeywordRoleSelection::new(Arc::clone(&client)))
            }
        };
        let mut prompt_builder = PromptBuilder::new().with_budget(config.context_budget);
        if let Some(context) = &config.context {
            prompt_builder = prompt_builder.with_context(context.clone());
        }
        Self::new(client)
            .with_policy(policy)
            .with_prompt_builder(prompt_builder)
    }

    /// Replace the role-selection policy (builder pattern).
    pub fn with_policy(mut self, policy: Arc<dyn RoleSelectionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the prompt builder (builder pattern).
    pub fn with_prompt_builder(mut self, prompt_builder: PromptBuilder) -> Self {
        self.prompt_builder = prompt_builder;
        self
    }

    /// Start from a given role repository instead of the seed set (builder pattern).
    pub fn with_role_repository(mut self, roles: RoleRepository) -> Self {
        self.state.get_mut().roles = roles;
        self
    }

    /// Attach an [`EventHandler`] for run lifecycle events (builder pattern).
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    async fn emit(&self, event: OrchestrationEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_orchestration_event(&event).await;
        }
    }

    /// Run the full pipeline for `query` and return the completed [`Run`].
    ///
    /// # Errors
    ///
    /// - [`OrchestrationError::InvalidInput`] for an empty query.
    /// - [`OrchestrationError::RoleSelection`] when the policy fails or yields no usable role.
    /// - [`OrchestrationError::SpecialistCall`] naming the index and role whose call failed.
    /// - [`OrchestrationError::Synthesis`] carrying the completed specialist analyses.
    /// - [`OrchestrationError::ContextBudgetExceeded`] when a prompt cannot fit the budget.
    ///
    /// On any error the role repository and run history are left unchanged.
    pub async fn run_query(
        &self,
        query: &str,
        options: &RunOptions,
    ) -> Result<Run, OrchestrationError> {
        let run_id = Uuid::new_v4();
        self.emit(OrchestrationEvent::RunStarted {
            run_id,
            query: query.to_string(),
        })
        .await;

        let result = self.execute(run_id, query, options).await;

        match &result {
            Ok(run) => {
                log::info!(
                    "Run {} completed: {} specialist(s), {} chars",
                    run_id,
                    run.metadata.specialist_count,
                    run.metadata.total_characters
                );
                self.emit(OrchestrationEvent::RunCompleted {
                    run_id,
                    specialist_count: run.metadata.specialist_count,
                    total_characters: run.metadata.total_characters,
                    total_tokens: run.metadata.total_tokens_used,
                })
                .await;
            }
            Err(err) => {
                log::error!("Run {} failed in {} phase: {}", run_id, err.phase(), err);
                self.emit(OrchestrationEvent::RunFailed {
                    run_id,
                    phase: err.phase().to_string(),
                    error: err.to_string(),
                })
                .await;
            }
        }

        result
    }

    async fn execute(
        &self,
        run_id: Uuid,
        query: &str,
        options: &RunOptions,
    ) -> Result<Run, OrchestrationError> {
        if query.trim().is_empty() {
            return Err(OrchestrationError::InvalidInput("query is empty".to_string()));
        }
        let started_at = Utc::now();

        let policy = options.policy.as_ref().unwrap_or(&self.policy);
        let builder = match &options.context {
            Some(context) => self.prompt_builder.clone().with_context(context.clone()),
            None => self.prompt_builder.clone(),
        };

        // Phase 1: role selection
        let selection = policy
            .select_roles(query, builder.context())
            .await
            .map_err(|source| OrchestrationError::RoleSelection {
                policy: policy.name().to_string(),
                source,
            })?;
        let roles = normalized_roles(selection.roles).map_err(|source| {
            OrchestrationError::RoleSelection {
                policy: policy.name().to_string(),
                source,
            }
        })?;

        log::info!(
            "Run {}: {} selected [{}]",
            run_id,
            policy.name(),
            roles
                .iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.emit(OrchestrationEvent::RolesSelected {
            run_id,
            policy: policy.name().to_string(),
            roles: roles.iter().map(|r| r.name.clone()).collect(),
        })
        .await;

        // Phase 2: specialists, each fed every prior analysis
        let mut analyses: Vec<Analysis> = Vec::with_capacity(roles.len());
        let mut total_prompt_characters = 0;
        let mut total_tokens = 0;

        for (index, role) in roles.iter().enumerate() {
            let prompt = builder.build_specialist_prompt(role, query, &analyses)?;
            let prompt_size = prompt.chars().count();
            total_prompt_characters += prompt_size;

            log::debug!(
                "Run {}: specialist {} ({}) prompt is {} chars",
                run_id,
                index,
                role.name,
                prompt_size
            );
            self.emit(OrchestrationEvent::SpecialistStarted {
                run_id,
                index,
                role: role.name.clone(),
                prompt_size,
            })
            .await;

            let (text, tokens_used) = match self.client.complete_with_usage(&prompt).await {
                Ok(reply) => reply,
                Err(source) => {
                    self.emit(OrchestrationEvent::SpecialistFailed {
                        run_id,
                        index,
                        role: role.name.clone(),
                        error: source.to_string(),
                    })
                    .await;
                    return Err(OrchestrationError::SpecialistCall {
                        index,
                        role: role.name.clone(),
                        source,
                    });
                }
            };

            if let Some(usage) = &tokens_used {
                total_tokens += usage.total_tokens;
            }
            self.emit(OrchestrationEvent::SpecialistCompleted {
                run_id,
                index,
                role: role.name.clone(),
                response_length: text.chars().count(),
                tokens_used,
            })
            .await;

            analyses.push(Analysis::new(&role.name, query, text, prompt_size));
        }

        // Phase 3: synthesis
        let prompt = builder.build_synthesis_prompt(query, &analyses)?;
        let prompt_size = prompt.chars().count();
        total_prompt_characters += prompt_size;
        self.emit(OrchestrationEvent::SynthesisStarted {
            run_id,
            prompt_size,
        })
        .await;

        let (text, tokens_used) = match self.client.complete_with_usage(&prompt).await {
            Ok(reply) => reply,
            Err(source) => {
                self.emit(OrchestrationEvent::SynthesisFailed {
                    run_id,
                    error: source.to_string(),
                })
                .await;
                return Err(OrchestrationError::Synthesis {
                    completed: analyses,
                    source,
                });
            }
        };
        if let Some(usage) = &tokens_used {
            total_tokens += usage.total_tokens;
        }
        self.emit(OrchestrationEvent::SynthesisCompleted {
            run_id,
            response_length: text.chars().count(),
            tokens_used,
        })
        .await;

        let synthesis = Analysis::new(SYNTHESIS_ROLE, query, text, prompt_size);
        let run = self.assemble_run(
            run_id,
            query,
            selection.raw_output,
            analyses,
            synthesis,
            RunTotals {
                prompt_characters: total_prompt_characters,
                tokens: total_tokens,
                policy: policy.name().to_string(),
                started_at,
            },
        );

        self.commit(&roles, &run).await?;
        Ok(run)
    }

    fn assemble_run(
        &self,
        run_id: Uuid,
        query: &str,
        role_selection_output: String,
        analyses: Vec<Analysis>,
        synthesis: Analysis,
        totals: RunTotals,
    ) -> Run {
        let total_characters = analyses
            .iter()
            .chain(std::iter::once(&synthesis))
            .map(|a| a.text.chars().count())
            .sum();
        Run {
            id: run_id,
            query: query.to_string(),
            role_selection_output,
            metadata: RunMetadata {
                specialist_count: analyses.len(),
                total_characters,
                total_prompt_characters: totals.prompt_characters,
                total_tokens_used: totals.tokens,
                role_selection_policy: totals.policy,
                model: self.client.model_name().to_string(),
                started_at: totals.started_at,
                completed_at: Utc::now(),
            },
            analyses,
            synthesis,
        }
    }

    /// Credit every specialist role and record the run, atomically with respect to other runs.
    async fn commit(&self, roles: &[RoleLabel], run: &Run) -> Result<(), OrchestrationError> {
        let mut state = self.state.lock().await;
        for role in roles {
            let key = state
                .roles
                .upsert(&role.name, &role.description)
                .map_err(|err| OrchestrationError::InvalidInput(err.to_string()))?;
            state
                .roles
                .increment_usage(&key)
                .map_err(|err| OrchestrationError::InvalidInput(err.to_string()))?;
        }
        state.history.append(run.clone());
        Ok(())
    }

    /// Snapshot of one role, looked up by any spelling of its name.
    pub async fn role(&self, name: &str) -> Option<Role> {
        self.state.lock().await.roles.get(name).cloned()
    }

    /// Snapshot of every known role in registration order.
    pub async fn roles(&self) -> Vec<Role> {
        self.state.lock().await.roles.all_roles()
    }

    /// Snapshot of every completed run in completion order.
    pub async fn runs(&self) -> Vec<Run> {
        self.state.lock().await.history.all_runs().to_vec()
    }

    pub async fn run_count(&self) -> usize {
        self.state.lock().await.history.count()
    }

    pub async fn report(&self) -> HistoryReport {
        self.state.lock().await.history.report()
    }
}

struct RunTotals {
    prompt_characters: usize,
    tokens: usize,
    policy: String,
    started_at: DateTime<Utc>,
}

/// Normalize policy output, rejecting an empty selection or labels with no usable name.
fn normalized_roles(roles: Vec<RoleLabel>) -> Result<Vec<RoleLabel>, BoxError> {
    if roles.is_empty() {
        return Err("policy returned no roles".into());
    }
    roles
        .into_iter()
        .map(|role| -> Result<RoleLabel, BoxError> {
            let name = normalize_role_name(&role.name);
            if name.is_empty() {
                Err(format!("policy returned unusable role label '{}'", role.name).into())
            } else {
                Ok(RoleLabel {
                    name,
                    description: role.description,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_roles_rejects_empty_and_unusable_labels() {
        assert!(normalized_roles(vec![]).is_err());
        let bad = RoleLabel {
            name: "???".to_string(),
            description: "x".to_string(),
        };
        assert!(normalized_roles(vec![bad]).is_err());
    }

    #[test]
    fn normalized_roles_fixes_spelling() {
        let raw = RoleLabel {
            name: "Risk Assessor".to_string(),
            description: "Finds risks".to_string(),
        };
        let roles = normalized_roles(vec![raw]).unwrap();
        assert_eq!(roles[0].name, "risk_assessor");
        assert_eq!(roles[0].description, "Finds risks");
    }
}
