//! Errors surfaced by prompt construction and [`Orchestrator::run_query`](crate::Orchestrator::run_query).
//!
//! Every failure aborts the run it belongs to. The variants carry enough context (phase,
//! role index and label) for the caller to diagnose what happened; nothing is retried.
//!
//! ```
//! use chorusllm::error::{OrchestrationError, Phase};
//!
//! let err = OrchestrationError::SpecialistCall {
//!     index: 1,
//!     role: "ethics_guardian".into(),
//!     source: "quota exceeded".into(),
//! };
//! assert_eq!(err.phase(), Phase::Specialist);
//! assert_eq!(
//!     err.to_string(),
//!     "Specialist call 1 (ethics_guardian) failed: quota exceeded"
//! );
//! ```

use crate::client_wrapper::BoxError;
use crate::run::Analysis;
use std::error::Error;
use std::fmt;

/// Pipeline stage in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    RoleSelection,
    Specialist,
    Synthesis,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Input => "input",
            Phase::RoleSelection => "role-selection",
            Phase::Specialist => "specialist",
            Phase::Synthesis => "synthesis",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum OrchestrationError {
    /// The role-selection policy failed or produced no roles.
    RoleSelection { policy: String, source: BoxError },

    /// The model call for the specialist at `index` (0-based) failed.
    SpecialistCall {
        index: usize,
        role: String,
        source: BoxError,
    },

    /// The synthesis call failed after every specialist succeeded. `completed` holds the
    /// finished specialist analyses for diagnostics; the run is not recorded.
    Synthesis {
        completed: Vec<Analysis>,
        source: BoxError,
    },

    /// Malformed call, e.g. an empty query or nothing to synthesize.
    InvalidInput(String),

    /// A prompt could not be brought under the configured context budget.
    ContextBudgetExceeded {
        phase: Phase,
        chars: usize,
        limit: usize,
    },
}

impl OrchestrationError {
    /// The stage the error belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            OrchestrationError::RoleSelection { .. } => Phase::RoleSelection,
            OrchestrationError::SpecialistCall { .. } => Phase::Specialist,
            OrchestrationError::Synthesis { .. } => Phase::Synthesis,
            OrchestrationError::InvalidInput(_) => Phase::Input,
            OrchestrationError::ContextBudgetExceeded { phase, .. } => *phase,
        }
    }
}

impl fmt::Display for OrchestrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestrationError::RoleSelection { policy, source } => {
                write!(f, "Role selection ({}) failed: {}", policy, source)
            }
            OrchestrationError::SpecialistCall {
                index,
                role,
                source,
            } => write!(f, "Specialist call {} ({}) failed: {}", index, role, source),
            OrchestrationError::Synthesis { completed, source } => write!(
                f,
                "Synthesis failed after {} specialist analyses: {}",
                completed.len(),
                source
            ),
            OrchestrationError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            OrchestrationError::ContextBudgetExceeded {
                phase,
                chars,
                limit,
            } => write!(
                f,
                "{} prompt needs {} chars, context budget is {}",
                phase, chars, limit
            ),
        }
    }
}

impl Error for OrchestrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OrchestrationError::RoleSelection { source, .. }
            | OrchestrationError::SpecialistCall { source, .. }
            | OrchestrationError::Synthesis { source, .. } => Some(source.as_ref()),
            OrchestrationError::InvalidInput(_)
            | OrchestrationError::ContextBudgetExceeded { .. } => None,
        }
    }
}
