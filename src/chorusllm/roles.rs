//! Analytical roles and the in-memory registry that counts how often each one is used.
//!
//! Role identity is a normalized string key. [`normalize_role_name`] is the single
//! normalization rule and every insertion and lookup in [`RoleRepository`] goes through it,
//! so `"Risk Assessor"`, `"risk-assessor"` and `"risk_assessor"` all credit the same role.
//!
//! ```rust
//! use chorusllm::roles::RoleRepository;
//!
//! let mut repo = RoleRepository::with_seed_roles();
//! repo.increment_usage("Risk Assessor").unwrap();
//! assert_eq!(repo.get("risk_assessor").unwrap().usage_count, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Role used for the final integrative call of every run.
pub const SYNTHESIS_ROLE: &str = "synthesis_integrator";

/// Description placed into synthesis prompts for [`SYNTHESIS_ROLE`].
pub const SYNTHESIS_DEFINITION: &str =
    "Integrates every specialist perspective into one coherent, balanced answer, resolving tensions between them.";

/// Roles every repository starts with, in registration order.
pub const SEED_ROLES: [(&str, &str); 4] = [
    (
        "systems_analyst",
        "Maps the system as a whole: components, feedback loops, dependencies and second-order effects.",
    ),
    (
        "ethics_guardian",
        "Examines fairness, consent, harm and the interests of everyone affected.",
    ),
    (
        "practical_implementer",
        "Turns ideas into concrete, feasible steps with resources, owners and sequencing.",
    ),
    (
        "risk_assessor",
        "Critically identifies risks, failure modes and blind spots in the analysis so far.",
    ),
];

/// Normalize free-text role labels into registry keys.
///
/// Lowercases (Unicode-aware), collapses every run of characters that are not alphanumeric
/// into a single `_`, and strips leading/trailing underscores. Letters from any script are
/// kept. Returns an empty string when the label contains no alphanumeric characters at all.
pub fn normalize_role_name(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_separator = false;
    for ch in label.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

/// A named analytical perspective with a persistent usage counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Normalized unique key.
    pub name: String,
    /// Human-readable description of the perspective's focus.
    pub definition: String,
    /// Number of successful runs this role has participated in.
    pub usage_count: u64,
}

/// One specialist slot chosen by a role-selection policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLabel {
    /// Normalized role key.
    pub name: String,
    /// Canonical description rendered into the specialist prompt.
    pub description: String,
}

impl RoleLabel {
    /// Build a label, normalizing `name`.
    pub fn new(name: impl AsRef<str>, description: impl Into<String>) -> Self {
        Self {
            name: normalize_role_name(name.as_ref()),
            description: description.into(),
        }
    }
}

/// Errors raised by [`RoleRepository`] mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    /// The label normalizes to an empty key.
    EmptyName(String),
    /// No role with this key has been registered.
    UnknownRole(String),
}

impl fmt::Display for RoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleError::EmptyName(label) => write!(f, "Role label '{}' has no usable name", label),
            RoleError::UnknownRole(name) => write!(f, "Unknown role: {}", name),
        }
    }
}

impl std::error::Error for RoleError {}

/// In-memory registry of roles keyed by normalized name.
///
/// Not synchronized on its own; the [`Orchestrator`](crate::Orchestrator) keeps it behind a
/// lock together with the run history.
#[derive(Debug, Clone, Default)]
pub struct RoleRepository {
    roles: HashMap<String, Role>,
    /// Keys in first-registration order.
    order: Vec<String>,
}

impl RoleRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with [`SEED_ROLES`].
    pub fn with_seed_roles() -> Self {
        let mut repo = Self::new();
        for (name, definition) in SEED_ROLES {
            // Seed names are already normalized and non-empty.
            let _ = repo.upsert(name, definition);
        }
        repo
    }

    /// Look up a role by any spelling that normalizes to its key.
    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.get(&normalize_role_name(name))
    }

    /// Register a role if it is new and return its key.
    ///
    /// An existing role keeps its definition and usage count; only an empty definition is
    /// filled in.
    pub fn upsert(&mut self, name: &str, definition: &str) -> Result<String, RoleError> {
        let key = normalize_role_name(name);
        if key.is_empty() {
            return Err(RoleError::EmptyName(name.to_string()));
        }
        match self.roles.get_mut(&key) {
            Some(existing) => {
                if existing.definition.is_empty() {
                    existing.definition = definition.to_string();
                }
            }
            None => {
                log::debug!("RoleRepository: registering role '{}'", key);
                self.order.push(key.clone());
                self.roles.insert(
                    key.clone(),
                    Role {
                        name: key.clone(),
                        definition: definition.to_string(),
                        usage_count: 0,
                    },
                );
            }
        }
        Ok(key)
    }

    /// Add one to a registered role's usage count and return the new value.
    pub fn increment_usage(&mut self, name: &str) -> Result<u64, RoleError> {
        let key = normalize_role_name(name);
        let role = self
            .roles
            .get_mut(&key)
            .ok_or_else(|| RoleError::UnknownRole(key.clone()))?;
        role.usage_count += 1;
        Ok(role.usage_count)
    }

    /// All roles in first-registration order.
    pub fn all_roles(&self) -> Vec<Role> {
        self.order
            .iter()
            .filter_map(|key| self.roles.get(key))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
