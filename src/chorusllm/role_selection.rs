//! Pluggable strategies for choosing which specialist roles run for a query.
//!
//! The [`RoleSelectionPolicy`] trait is the seam between the orchestrator and whatever decides
//! the team. Two implementations are provided:
//!
//! - [`StaticRoleSelection`]: a fixed table of roles, no model call. The default table is the
//!   seed set (systems, ethics, practical, risk); tests pass their own table.
//! - [`KeywordRoleSelection`]: asks the model to design roles for the query, then scans the
//!   reply for a fixed keyword vocabulary and maps each hit to a canonical role. This is a
//!   heuristic, not real planning; replace it by implementing the trait.
//!
//! # Implementing a Custom Policy
//!
//! ```rust
//! use async_trait::async_trait;
//! use chorusllm::client_wrapper::BoxError;
//! use chorusllm::role_selection::{RoleSelection, RoleSelectionPolicy};
//! use chorusllm::roles::RoleLabel;
//!
//! struct Solo;
//!
//! #[async_trait]
//! impl RoleSelectionPolicy for Solo {
//!     async fn select_roles(
//!         &self,
//!         _query: &str,
//!         _context: Option<&str>,
//!     ) -> Result<RoleSelection, BoxError> {
//!         Ok(RoleSelection::new(
//!             vec![RoleLabel::new("devils_advocate", "Argues the opposite.")],
//!             "devils_advocate",
//!         ))
//!     }
//!
//!     fn name(&self) -> &str { "Solo" }
//! }
//! ```

use crate::client_wrapper::{BoxError, ClientWrapper};
use crate::prompt_builder::PromptBuilder;
use crate::roles::{RoleLabel, SEED_ROLES};
use async_trait::async_trait;
use std::sync::Arc;

/// Ordered roles for one run plus the raw text the decision was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSelection {
    pub roles: Vec<RoleLabel>,
    /// Raw output of the selection step, recorded on the run.
    pub raw_output: String,
}

impl RoleSelection {
    pub fn new(roles: Vec<RoleLabel>, raw_output: impl Into<String>) -> Self {
        Self {
            roles,
            raw_output: raw_output.into(),
        }
    }
}

/// Chooses the ordered specialist roles for a query.
#[async_trait]
pub trait RoleSelectionPolicy: Send + Sync {
    /// Produce the roles to run, in order. `context` is optional situational framing.
    async fn select_roles(
        &self,
        query: &str,
        context: Option<&str>,
    ) -> Result<RoleSelection, BoxError>;

    /// Human-readable name for logging and run metadata.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// StaticRoleSelection
// ---------------------------------------------------------------------------

/// Returns the same table of roles for every query.
///
/// ```rust
/// use chorusllm::role_selection::StaticRoleSelection;
/// use chorusllm::roles::RoleLabel;
///
/// let default_pool = StaticRoleSelection::default();
/// assert_eq!(default_pool.roles().len(), 4);
///
/// let pair = StaticRoleSelection::new(vec![
///     RoleLabel::new("systems_analyst", "Systems view"),
///     RoleLabel::new("ethics_guardian", "Ethics view"),
/// ]);
/// assert_eq!(pair.roles()[1].name, "ethics_guardian");
/// ```
#[derive(Debug, Clone)]
pub struct StaticRoleSelection {
    roles: Vec<RoleLabel>,
}

impl StaticRoleSelection {
    pub fn new(roles: Vec<RoleLabel>) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> &[RoleLabel] {
        &self.roles
    }
}

impl Default for StaticRoleSelection {
    /// The seed roles: systems, ethics, practical, risk.
    fn default() -> Self {
        Self::new(
            SEED_ROLES
                .iter()
                .map(|(name, definition)| RoleLabel::new(name, *definition))
                .collect(),
        )
    }
}

#[async_trait]
impl RoleSelectionPolicy for StaticRoleSelection {
    async fn select_roles(
        &self,
        _query: &str,
        _context: Option<&str>,
    ) -> Result<RoleSelection, BoxError> {
        let raw_output = self
            .roles
            .iter()
            .map(|r| format!("- {}: {}", r.name, r.description))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(RoleSelection::new(self.roles.clone(), raw_output))
    }

    fn name(&self) -> &str {
        "StaticRoleSelection"
    }
}

// ---------------------------------------------------------------------------
// KeywordRoleSelection
// ---------------------------------------------------------------------------

/// Keyword vocabulary in scan order, each mapped to its canonical role.
pub const KEYWORD_ROLES: [(&str, &str, &str); 7] = [
    (
        "economic",
        "economic_analyst",
        "Evaluates costs, incentives, markets and distributional economic effects.",
    ),
    (
        "social",
        "social_impact_analyst",
        "Examines effects on communities, relationships, equity and social cohesion.",
    ),
    (
        "technical",
        "technical_architect",
        "Assesses technical feasibility, architecture, constraints and implementation detail.",
    ),
    (
        "psychological",
        "psychology_specialist",
        "Considers motivation, behaviour, cognitive biases and wellbeing of the people involved.",
    ),
    (
        "environmental",
        "environmental_analyst",
        "Weighs ecological impact, resource use and long-term sustainability.",
    ),
    (
        "legal",
        "legal_advisor",
        "Identifies regulatory requirements, liability and legal exposure.",
    ),
    (
        "cultural",
        "cultural_analyst",
        "Reads the question through cultural norms, values, traditions and identity.",
    ),
];

/// Role appended to every keyword-derived selection.
pub const CRITICAL_RISK_ROLE: (&str, &str) = (
    "risk_assessor",
    "Critically identifies risks, failure modes and blind spots in the analysis so far.",
);

/// Most roles a keyword-derived selection may contain, the risk role included.
pub const MAX_KEYWORD_SELECTION: usize = 4;

/// Model-assisted selection: one role-design call, then keyword extraction.
pub struct KeywordRoleSelection {
    client: Arc<dyn ClientWrapper>,
    prompt_builder: PromptBuilder,
}

impl KeywordRoleSelection {
    pub fn new(client: Arc<dyn ClientWrapper>) -> Self {
        Self {
            client,
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// Derive roles from free text: keyword hits in fixed scan order (not text order), at
    /// most three, followed by the critical risk role.
    ///
    /// ```rust
    /// use chorusllm::role_selection::KeywordRoleSelection;
    ///
    /// let roles = KeywordRoleSelection::roles_from_text("Legal and ECONOMIC angles matter.");
    /// let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    /// assert_eq!(names, ["economic_analyst", "legal_advisor", "risk_assessor"]);
    /// ```
    pub fn roles_from_text(text: &str) -> Vec<RoleLabel> {
        let haystack = text.to_lowercase();
        let mut roles: Vec<RoleLabel> = KEYWORD_ROLES
            .iter()
            .filter(|(keyword, _, _)| haystack.contains(keyword))
            .take(MAX_KEYWORD_SELECTION - 1)
            .map(|(_, name, description)| RoleLabel::new(name, *description))
            .collect();
        roles.push(RoleLabel::new(CRITICAL_RISK_ROLE.0, CRITICAL_RISK_ROLE.1));
        roles
    }
}

#[async_trait]
impl RoleSelectionPolicy for KeywordRoleSelection {
    async fn select_roles(
        &self,
        query: &str,
        context: Option<&str>,
    ) -> Result<RoleSelection, BoxError> {
        let builder = match context {
            Some(context) => self.prompt_builder.clone().with_context(context),
            None => self.prompt_builder.clone(),
        };
        let prompt = builder.build_role_design_prompt(query)?;
        let raw_output = self.client.complete(&prompt).await?;
        let roles = Self::roles_from_text(&raw_output);
        if roles.len() == 1 {
            log::warn!(
                "KeywordRoleSelection: no domain keywords in role design reply, running only '{}'",
                CRITICAL_RISK_ROLE.0
            );
        }
        log::debug!(
            "KeywordRoleSelection: selected [{}]",
            roles
                .iter()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(RoleSelection::new(roles, raw_output))
    }

    fn name(&self) -> &str {
        "KeywordRoleSelection"
    }
}
