//! Append-only log of completed runs, with aggregate reporting.

use crate::run::Run;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Completed runs in completion order. Runs are only ever appended.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    runs: Vec<Run>,
}

/// Aggregate statistics over a [`RunHistory`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryReport {
    pub total_runs: usize,
    pub total_specialist_calls: usize,
    pub total_characters: usize,
    pub total_tokens_used: usize,
    /// `(role, specialist appearances)` sorted by descending count, then by name.
    pub role_frequency: Vec<(String, usize)>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, run: Run) {
        self.runs.push(run);
    }

    pub fn all_runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn count(&self) -> usize {
        self.runs.len()
    }

    pub fn last(&self) -> Option<&Run> {
        self.runs.last()
    }

    pub fn report(&self) -> HistoryReport {
        let mut frequency: HashMap<&str, usize> = HashMap::new();
        let mut report = HistoryReport {
            total_runs: self.runs.len(),
            ..HistoryReport::default()
        };

        for run in &self.runs {
            report.total_specialist_calls += run.analyses.len();
            report.total_characters += run.metadata.total_characters;
            report.total_tokens_used += run.metadata.total_tokens_used;
            for analysis in &run.analyses {
                *frequency.entry(analysis.role.as_str()).or_insert(0) += 1;
            }
        }

        let mut role_frequency: Vec<(String, usize)> = frequency
            .into_iter()
            .map(|(role, count)| (role.to_string(), count))
            .collect();
        role_frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        report.role_frequency = role_frequency;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::{Analysis, RunMetadata};
    use chrono::Utc;
    use uuid::Uuid;

    fn run_with(roles: &[&str], chars: usize) -> Run {
        Run {
            id: Uuid::new_v4(),
            query: "q".to_string(),
            role_selection_output: String::new(),
            analyses: roles.iter().map(|r| Analysis::new(*r, "q", "t", 1)).collect(),
            synthesis: Analysis::new("synthesis_integrator", "q", "s", 1),
            metadata: RunMetadata {
                specialist_count: roles.len(),
                total_characters: chars,
                total_prompt_characters: 0,
                total_tokens_used: 7,
                role_selection_policy: "test".to_string(),
                model: "stub".to_string(),
                started_at: Utc::now(),
                completed_at: Utc::now(),
            },
        }
    }

    #[test]
    fn report_aggregates_runs() {
        let mut history = RunHistory::new();
        history.append(run_with(&["b_role", "risk_assessor"], 10));
        history.append(run_with(&["a_role", "risk_assessor"], 5));

        let report = history.report();
        assert_eq!(report.total_runs, 2);
        assert_eq!(report.total_specialist_calls, 4);
        assert_eq!(report.total_characters, 15);
        assert_eq!(report.total_tokens_used, 14);
        assert_eq!(
            report.role_frequency,
            vec![
                ("risk_assessor".to_string(), 2),
                ("a_role".to_string(), 1),
                ("b_role".to_string(), 1),
            ]
        );
    }

    #[test]
    fn empty_history_reports_zeroes() {
        let history = RunHistory::new();
        assert_eq!(history.count(), 0);
        assert!(history.last().is_none());
        assert_eq!(history.report(), HistoryReport::default());
    }
}
