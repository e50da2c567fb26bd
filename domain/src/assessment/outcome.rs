//! Outcome classification for a finished conversation.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! | # | Condition | Outcome |
//! |---|-----------|---------|
//! | 1 | any message states disinterest or a hard mismatch | `not_a_fit` |
//! | 2 | both closing turns commit to a next step | `mutual_interest` (same kind) / `interested_next_steps` |
//! | 2b | only one closing turn commits | `needs_more_info` |
//! | 3 | a closing turn asks for validation | `needs_more_info` |
//! | 4 | ended only because the turn budget ran out | `follow_up_later` |
//! | 5 | otherwise | `needs_more_info` |
//!
//! Absence of signal never yields a positive label.

use super::lexicon::{Lexicon, NextStepKind};
use crate::conversation::{Metrics, Phase, TerminationReason, Turn};
use crate::persona::Speaker;
use serde::{Deserialize, Serialize};

/// How a finished conversation resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    MutualInterest,
    InterestedNextSteps,
    NeedsMoreInfo,
    FollowUpLater,
    NotAFit,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::MutualInterest => "mutual_interest",
            Outcome::InterestedNextSteps => "interested_next_steps",
            Outcome::NeedsMoreInfo => "needs_more_info",
            Outcome::FollowUpLater => "follow_up_later",
            Outcome::NotAFit => "not_a_fit",
        }
    }

    /// Whether the label signals interest from at least one side
    pub fn is_positive(&self) -> bool {
        matches!(self, Outcome::MutualInterest | Outcome::InterestedNextSteps)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mutual_interest" => Ok(Outcome::MutualInterest),
            "interested_next_steps" => Ok(Outcome::InterestedNextSteps),
            "needs_more_info" => Ok(Outcome::NeedsMoreInfo),
            "follow_up_later" => Ok(Outcome::FollowUpLater),
            "not_a_fit" => Ok(Outcome::NotAFit),
            _ => Err(format!("Unknown outcome: {}", s)),
        }
    }
}

/// Which rule produced the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationBasis {
    Disinterest,
    SharedNextStep,
    DifferentNextSteps,
    OneSidedCommitment,
    ValidationRequested,
    TurnBudgetExhausted,
    NoSignal,
}

impl ClassificationBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationBasis::Disinterest => "disinterest",
            ClassificationBasis::SharedNextStep => "shared_next_step",
            ClassificationBasis::DifferentNextSteps => "different_next_steps",
            ClassificationBasis::OneSidedCommitment => "one_sided_commitment",
            ClassificationBasis::ValidationRequested => "validation_requested",
            ClassificationBasis::TurnBudgetExhausted => "turn_budget_exhausted",
            ClassificationBasis::NoSignal => "no_signal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub outcome: Outcome,
    pub basis: ClassificationBasis,
}

impl Classification {
    fn new(outcome: Outcome, basis: ClassificationBasis) -> Self {
        Self { outcome, basis }
    }
}

/// Deterministic, rule-ordered outcome classifier
#[derive(Debug, Clone, Default)]
pub struct OutcomeClassifier {
    lexicon: Lexicon,
}

impl OutcomeClassifier {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify a finished (or truncated) transcript.
    pub fn classify(
        &self,
        turns: &[Turn],
        metrics: &Metrics,
        final_phase: Phase,
        termination: Option<&TerminationReason>,
    ) -> Classification {
        if metrics.disinterest_hits > 0
            || turns.iter().any(|t| self.lexicon.has_disinterest(&t.message))
        {
            return Classification::new(Outcome::NotAFit, ClassificationBasis::Disinterest);
        }

        let closing = closing_exchange(turns);

        if let Some((a, b)) = closing {
            let kinds_a = self.lexicon.commitment_kinds(&a.message);
            let kinds_b = self.lexicon.commitment_kinds(&b.message);

            match (kinds_a.is_empty(), kinds_b.is_empty()) {
                (false, false) => {
                    return if shares_kind(&kinds_a, &kinds_b) {
                        Classification::new(
                            Outcome::MutualInterest,
                            ClassificationBasis::SharedNextStep,
                        )
                    } else {
                        Classification::new(
                            Outcome::InterestedNextSteps,
                            ClassificationBasis::DifferentNextSteps,
                        )
                    };
                }
                (true, false) | (false, true) => {
                    return Classification::new(
                        Outcome::NeedsMoreInfo,
                        ClassificationBasis::OneSidedCommitment,
                    );
                }
                (true, true) => {}
            }

            if self.lexicon.requests_validation(&a.message)
                || self.lexicon.requests_validation(&b.message)
            {
                return Classification::new(
                    Outcome::NeedsMoreInfo,
                    ClassificationBasis::ValidationRequested,
                );
            }
        }

        if final_phase == Phase::Ended && termination == Some(&TerminationReason::MaxTurns) {
            return Classification::new(
                Outcome::FollowUpLater,
                ClassificationBasis::TurnBudgetExhausted,
            );
        }

        Classification::new(Outcome::NeedsMoreInfo, ClassificationBasis::NoSignal)
    }
}

fn shares_kind(a: &[NextStepKind], b: &[NextStepKind]) -> bool {
    a.iter().any(|k| b.contains(k))
}

/// Last turn of each speaker, once the conversation has reached Closing.
///
/// Returns `(profile_1 turn, profile_2 turn)`.
fn closing_exchange(turns: &[Turn]) -> Option<(&Turn, &Turn)> {
    if !turns.iter().any(|t| t.phase == Phase::Closing) {
        return None;
    }
    let last_of = |speaker: Speaker| turns.iter().rev().find(|t| t.speaker == speaker);
    Some((last_of(Speaker::A)?, last_of(Speaker::B)?))
}
