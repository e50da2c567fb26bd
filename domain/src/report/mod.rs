//! Match report, the artifact produced for one persona pair.

use crate::assessment::{ClassificationBasis, Decision, Outcome};
use crate::conversation::{Metrics, TerminationReason, Turn};
use crate::similarity::{SimilarityReport, SimilaritySignals};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the conversation ran to a natural end.
///
/// Flattened into the report as `"status": "completed"` or
/// `"status": "truncated", "error": "..."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Truncated { error: String },
}

impl RunStatus {
    pub fn from_termination(termination: &TerminationReason) -> Self {
        match termination {
            TerminationReason::GenerationFailed { error } => RunStatus::Truncated {
                error: error.clone(),
            },
            TerminationReason::Aborted => RunStatus::Truncated {
                error: "conversation aborted".to_string(),
            },
            _ => RunStatus::Completed,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, RunStatus::Truncated { .. })
    }
}

/// Full result of matching two personas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub persona_1: String,
    pub persona_2: String,
    #[serde(flatten)]
    pub status: RunStatus,
    pub termination: TerminationReason,
    pub outcome: Outcome,
    pub outcome_basis: ClassificationBasis,
    pub final_metrics: Metrics,
    pub conversation: Vec<Turn>,
    pub similarity_signals: SimilaritySignals,
    pub similarity_degraded: bool,
    /// Reviewer proposal before gating
    pub proposed_decision: Decision,
    /// Final, gated decision
    pub chat_decision: Decision,
    pub lexicon_version: String,
    pub generated_at: DateTime<Utc>,
}

impl MatchReport {
    pub fn similarity(&self) -> SimilarityReport {
        SimilarityReport {
            signals: self.similarity_signals,
            degraded: self.similarity_degraded,
        }
    }

    /// File name used when persisting the report: `<id1>__vs__<id2>.json`
    pub fn file_name(&self) -> String {
        format!(
            "{}__vs__{}.json",
            sanitize_file_component(&self.persona_1),
            sanitize_file_component(&self.persona_2)
        )
    }
}

fn sanitize_file_component(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
