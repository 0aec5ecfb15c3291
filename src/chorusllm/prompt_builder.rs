//! Deterministic prompt construction.
//!
//! [`PromptBuilder`] turns a role, the query and the analyses produced so far into a single,
//! self-contained prompt. It never touches the network and never mutates state, so the same
//! inputs always produce the same text.
//!
//! Every specialist prompt carries a verbatim transcript of all prior analyses of the run,
//! each headed `### <role>` and separated by [`TRANSCRIPT_DELIMITER`]. Without a
//! [`ContextBudget`] nothing is elided and prompts grow with every step.
//!
//! ```rust
//! use chorusllm::prompt_builder::{PromptBuilder, FIRST_PERSPECTIVE_MARKER};
//! use chorusllm::roles::RoleLabel;
//!
//! let builder = PromptBuilder::new();
//! let role = RoleLabel::new("systems_analyst", "Maps feedback loops.");
//! let prompt = builder.build_specialist_prompt(&role, "Should we ban cars downtown?", &[]).unwrap();
//! assert!(prompt.contains(FIRST_PERSPECTIVE_MARKER));
//! ```

use crate::config::{BudgetPolicy, ContextBudget};
use crate::error::{OrchestrationError, Phase};
use crate::roles::{RoleLabel, SYNTHESIS_DEFINITION, SYNTHESIS_ROLE};
use crate::run::Analysis;

/// Shared framing that opens every specialist and synthesis prompt.
pub const PREAMBLE: &str = "You are one voice in a collaborative, multi-perspective analysis. \
Several specialists examine the same question in turn. Each one reads everything the others \
have written so far and adds what only their own perspective can see.";

/// Separates entries of the prior-analysis transcript.
pub const TRANSCRIPT_DELIMITER: &str = "\n\n---\n\n";

/// Placed where the transcript would be when no specialist has spoken yet.
pub const FIRST_PERSPECTIVE_MARKER: &str = "You are the first perspective in this analysis.";

const SPECIALIST_INSTRUCTION: &str = "Contribute your perspective on the question. Build on, \
challenge or extend the perspectives above instead of repeating them. Be specific.";

const SYNTHESIS_INSTRUCTION: &str = "Integrate all of the perspectives above into one coherent \
answer to the question. Do not add a new perspective of your own: reconcile agreements, \
resolve or name the tensions between them, and finish with clear recommendations.";

const ROLE_DESIGN_INSTRUCTION: &str = "Before the analysis starts, design the team. Propose 3 \
to 5 specialist roles whose perspectives together cover this question. For each role give a \
short name and one sentence on its focus, and say which dimensions of the problem it covers \
(for example economic, social, technical, psychological, environmental, legal or cultural).";

/// Builds specialist, synthesis and role-design prompts.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    context: Option<String>,
    budget: Option<ContextBudget>,
}

impl PromptBuilder {
    /// A builder with no situational context and no size bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append situational framing to every prompt (builder pattern).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = if context.trim().is_empty() {
            None
        } else {
            Some(context)
        };
        self
    }

    /// Bound specialist and synthesis prompt sizes (builder pattern).
    pub fn with_budget(mut self, budget: Option<ContextBudget>) -> Self {
        self.budget = budget;
        self
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn budget(&self) -> Option<ContextBudget> {
        self.budget
    }

    /// Prompt for one specialist, embedding every prior analysis of the same run in order.
    ///
    /// # Errors
    ///
    /// [`OrchestrationError::InvalidInput`] for an empty query or role name, and
    /// [`OrchestrationError::ContextBudgetExceeded`] when a budget is set and cannot be met.
    pub fn build_specialist_prompt(
        &self,
        role: &RoleLabel,
        query: &str,
        prior: &[Analysis],
    ) -> Result<String, OrchestrationError> {
        require_query(query)?;
        if role.name.trim().is_empty() {
            return Err(OrchestrationError::InvalidInput(
                "specialist role name is empty".to_string(),
            ));
        }
        let description = if role.description.trim().is_empty() {
            role.name.as_str()
        } else {
            role.description.as_str()
        };

        self.fit_to_budget(Phase::Specialist, prior, |transcript| {
            let mut prompt = self.header(query);
            prompt.push_str(&format!("YOUR ROLE ({}):\n{}\n\n", role.name, description));
            self.push_context(&mut prompt);
            prompt.push_str("PRIOR PERSPECTIVES:\n");
            prompt.push_str(transcript.unwrap_or(FIRST_PERSPECTIVE_MARKER));
            prompt.push_str("\n\n");
            prompt.push_str(SPECIALIST_INSTRUCTION);
            prompt
        })
    }

    /// Prompt for the final integrative call over all specialist analyses.
    ///
    /// # Errors
    ///
    /// [`OrchestrationError::InvalidInput`] when `analyses` is empty (nothing to synthesize)
    /// or the query is empty; [`OrchestrationError::ContextBudgetExceeded`] as for specialists.
    pub fn build_synthesis_prompt(
        &self,
        query: &str,
        analyses: &[Analysis],
    ) -> Result<String, OrchestrationError> {
        require_query(query)?;
        if analyses.is_empty() {
            return Err(OrchestrationError::InvalidInput(
                "no analyses to synthesize".to_string(),
            ));
        }

        self.fit_to_budget(Phase::Synthesis, analyses, |transcript| {
            let mut prompt = self.header(query);
            prompt.push_str(&format!(
                "YOUR ROLE ({}):\n{}\n\n",
                SYNTHESIS_ROLE, SYNTHESIS_DEFINITION
            ));
            self.push_context(&mut prompt);
            prompt.push_str("SPECIALIST PERSPECTIVES:\n");
            prompt.push_str(transcript.unwrap_or(""));
            prompt.push_str("\n\n");
            prompt.push_str(SYNTHESIS_INSTRUCTION);
            prompt
        })
    }

    /// Prompt asking the model to design the specialist roles for a query.
    pub fn build_role_design_prompt(&self, query: &str) -> Result<String, OrchestrationError> {
        require_query(query)?;
        let mut prompt = format!("QUESTION:\n{}\n\n", query);
        self.push_context(&mut prompt);
        prompt.push_str(ROLE_DESIGN_INSTRUCTION);
        Ok(prompt)
    }

    fn header(&self, query: &str) -> String {
        format!("{}\n\nQUESTION:\n{}\n\n", PREAMBLE, query)
    }

    fn push_context(&self, prompt: &mut String) {
        if let Some(context) = &self.context {
            prompt.push_str(&format!("SITUATION:\n{}\n\n", context));
        }
    }

    /// Render with the full transcript, then, if a budget applies, shed the oldest entries
    /// until the prompt fits. Synthesis always keeps at least the newest analysis.
    fn fit_to_budget<F>(
        &self,
        phase: Phase,
        analyses: &[Analysis],
        render: F,
    ) -> Result<String, OrchestrationError>
    where
        F: Fn(Option<&str>) -> String,
    {
        let full = render(transcript(analyses, 0).as_deref());
        let budget = match self.budget {
            Some(budget) => budget,
            None => return Ok(full),
        };
        let full_chars = full.chars().count();
        if full_chars <= budget.max_chars {
            return Ok(full);
        }

        if budget.policy == BudgetPolicy::DropOldest {
            let min_kept = if phase == Phase::Synthesis { 1 } else { 0 };
            for omitted in 1..=analyses.len().saturating_sub(min_kept) {
                let prompt = render(transcript(&analyses[omitted..], omitted).as_deref());
                if prompt.chars().count() <= budget.max_chars {
                    log::debug!(
                        "PromptBuilder: omitted {} prior analyses to fit {} chars",
                        omitted,
                        budget.max_chars
                    );
                    return Ok(prompt);
                }
            }
        }

        Err(OrchestrationError::ContextBudgetExceeded {
            phase,
            chars: full_chars,
            limit: budget.max_chars,
        })
    }
}

fn require_query(query: &str) -> Result<(), OrchestrationError> {
    if query.trim().is_empty() {
        return Err(OrchestrationError::InvalidInput("query is empty".to_string()));
    }
    Ok(())
}

/// Render `analyses` as a labeled transcript. `omitted` earlier entries are announced by a
/// marker. Returns `None` when there is nothing at all to show.
fn transcript(analyses: &[Analysis], omitted: usize) -> Option<String> {
    let mut entries: Vec<String> = Vec::with_capacity(analyses.len() + 1);
    if omitted > 0 {
        entries.push(format!(
            "[{} earlier perspective(s) omitted to fit the context budget]",
            omitted
        ));
    }
    entries.extend(
        analyses
            .iter()
            .map(|a| format!("### {}\n{}", a.role, a.text)),
    );
    if entries.is_empty() {
        None
    } else {
        Some(entries.join(TRANSCRIPT_DELIMITER))
    }
}
