//! Records produced by one orchestration run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One specialist's contribution to a run. The synthesis uses the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Normalized name of the role that produced it.
    pub role: String,
    /// The originating question, shared by every analysis of the run.
    pub query: String,
    /// The model's full output text.
    pub text: String,
    pub produced_at: DateTime<Utc>,
    /// Characters in the prompt that generated this analysis.
    pub prompt_size: usize,
}

impl Analysis {
    pub fn new(
        role: impl Into<String>,
        query: impl Into<String>,
        text: impl Into<String>,
        prompt_size: usize,
    ) -> Self {
        Self {
            role: role.into(),
            query: query.into(),
            text: text.into(),
            produced_at: Utc::now(),
            prompt_size,
        }
    }
}

/// Summary numbers attached to a finished [`Run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub specialist_count: usize,
    /// Characters across all specialist outputs plus the synthesis.
    pub total_characters: usize,
    /// Characters across every prompt sent, including the synthesis prompt.
    pub total_prompt_characters: usize,
    /// Provider-reported tokens; zero when the client does not report usage.
    pub total_tokens_used: usize,
    pub role_selection_policy: String,
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// One complete orchestration from query to synthesized output. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: Uuid,
    pub query: String,
    /// Raw text returned by the role-selection step.
    pub role_selection_output: String,
    /// Specialist analyses in selection order.
    pub analyses: Vec<Analysis>,
    pub synthesis: Analysis,
    pub metadata: RunMetadata,
}

impl Run {
    /// Names of the specialist roles, in the order they ran.
    pub fn role_names(&self) -> Vec<&str> {
        self.analyses.iter().map(|a| a.role.as_str()).collect()
    }

    /// Serialize the run for export.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
