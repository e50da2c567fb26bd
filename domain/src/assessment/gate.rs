//! Decision gate
//!
//! Reconciles the reviewer's proposed decision with the conversation outcome
//! and the similarity signals. Guardrails are evaluated in a fixed order and
//! earlier gates win:
//!
//! 1. **not_a_fit gate**: outcome `not_a_fit` forces `not_a_fit` (terminal)
//! 2. **outcome gate**: `needs_more_info` / `follow_up_later` block `proceed`
//!    unless a mutual next step was confirmed
//! 3. **similarity gate**: low (or unavailable) similarity blocks `proceed`
//!    unless a mutual next step was confirmed, and always caps confidence
//! 4. **moderate band**: confidence ceiling scales with the aggregate
//! 5. **pass-through**: clamp confidence, bound the rationale
//!
//! Notes added by the gate are prefixed with [`GATE_NOTE_MARKER`]. They depend
//! only on the outcome, the similarity and the mutual-next-step flag, and are
//! rebuilt on every application, so gating an already gated decision with the
//! same inputs returns it unchanged.

use super::decision::{Decision, DecisionKind, clamp_confidence};
use super::lexicon::Lexicon;
use super::outcome::Outcome;
use crate::conversation::Turn;
use crate::core::string::{bound_words, word_count};
use crate::similarity::SimilarityReport;
use serde::{Deserialize, Serialize};

/// Prefix of every note the gate appends to a rationale
pub const GATE_NOTE_MARKER: &str = "[gate]";

/// Thresholds and caps applied by the [`DecisionGate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatePolicy {
    pub not_a_fit_cap: f64,
    pub outcome_downgrade_cap: f64,
    pub outcome_cap: f64,
    pub low_similarity_threshold: f64,
    pub low_similarity_downgrade_cap: f64,
    pub low_similarity_proceed_cap: f64,
    pub low_similarity_cap: f64,
    pub moderate_similarity_threshold: f64,
    /// Confidence ceiling at the bottom of the moderate band
    pub moderate_floor_cap: f64,
    /// Confidence ceiling at the top of the moderate band
    pub moderate_ceiling_cap: f64,
    pub max_rationale_words: usize,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            not_a_fit_cap: 0.4,
            outcome_downgrade_cap: 0.55,
            outcome_cap: 0.65,
            low_similarity_threshold: 0.35,
            low_similarity_downgrade_cap: 0.45,
            low_similarity_proceed_cap: 0.6,
            low_similarity_cap: 0.55,
            moderate_similarity_threshold: 0.5,
            moderate_floor_cap: 0.6,
            moderate_ceiling_cap: 0.9,
            max_rationale_words: 80,
        }
    }
}

impl GatePolicy {
    /// Validate threshold ordering and ranges
    pub fn validate(&self) -> Result<(), String> {
        let caps = [
            self.not_a_fit_cap,
            self.outcome_downgrade_cap,
            self.outcome_cap,
            self.low_similarity_downgrade_cap,
            self.low_similarity_proceed_cap,
            self.low_similarity_cap,
            self.moderate_floor_cap,
            self.moderate_ceiling_cap,
        ];
        if caps.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err("confidence caps must lie in [0, 1]".to_string());
        }
        if self.low_similarity_threshold >= self.moderate_similarity_threshold {
            return Err(
                "low_similarity_threshold must be below moderate_similarity_threshold".to_string(),
            );
        }
        if self.max_rationale_words == 0 {
            return Err("max_rationale_words cannot be 0".to_string());
        }
        Ok(())
    }

    /// Confidence ceiling inside the moderate band, rising linearly with the
    /// aggregate from `moderate_floor_cap` to `moderate_ceiling_cap`.
    fn moderate_cap(&self, aggregate: f64) -> f64 {
        let span = self.moderate_similarity_threshold - self.low_similarity_threshold;
        let t = ((aggregate - self.low_similarity_threshold) / span).clamp(0.0, 1.0);
        self.moderate_floor_cap + t * (self.moderate_ceiling_cap - self.moderate_floor_cap)
    }
}

/// Whether one speaker proposed a concrete next step and the other
/// acknowledged it in the very next turn.
///
/// A reply that itself proposes something is a counter-proposal, not an
/// acknowledgment.
pub fn has_mutual_next_step(turns: &[Turn], lexicon: &Lexicon) -> bool {
    turns.windows(2).any(|pair| {
        let (proposal, reply) = (&pair[0], &pair[1]);
        proposal.speaker != reply.speaker
            && lexicon.has_proposal(&proposal.message)
            && !lexicon.has_proposal(&reply.message)
            && lexicon.has_acknowledgment(&reply.message)
    })
}

/// Policy-constrained final decision (pure)
#[derive(Debug, Clone, Default)]
pub struct DecisionGate {
    policy: GatePolicy,
    lexicon: Lexicon,
}

impl DecisionGate {
    pub fn new(policy: GatePolicy, lexicon: Lexicon) -> Self {
        Self { policy, lexicon }
    }

    pub fn policy(&self) -> &GatePolicy {
        &self.policy
    }

    /// Gate a proposal against a transcript
    pub fn apply(
        &self,
        proposed: &Decision,
        outcome: Outcome,
        similarity: &SimilarityReport,
        transcript: &[Turn],
    ) -> Decision {
        let mutual_next_step = has_mutual_next_step(transcript, &self.lexicon);
        self.apply_with(proposed, outcome, similarity, mutual_next_step)
    }

    /// Gate a proposal given a precomputed mutual-next-step flag
    pub fn apply_with(
        &self,
        proposed: &Decision,
        outcome: Outcome,
        similarity: &SimilarityReport,
        mutual_next_step: bool,
    ) -> Decision {
        let p = &self.policy;
        let mut decision = proposed.decision;
        let mut confidence = clamp_confidence(proposed.confidence);
        let mut notes: Vec<String> = Vec::new();

        // 1. not_a_fit gate (terminal)
        if outcome == Outcome::NotAFit {
            notes.push(format!(
                "{} Conversation outcome is not_a_fit; decision normalized.",
                GATE_NOTE_MARKER
            ));
            return self.finish(
                DecisionKind::NotAFit,
                &proposed.rationale,
                confidence.min(p.not_a_fit_cap),
                &notes,
            );
        }

        // 2. outcome gate
        if matches!(outcome, Outcome::NeedsMoreInfo | Outcome::FollowUpLater) {
            if mutual_next_step {
                confidence = confidence.min(p.outcome_cap);
            } else {
                if decision == DecisionKind::Proceed {
                    decision = DecisionKind::MoreInfo;
                    confidence = confidence.min(p.outcome_downgrade_cap);
                } else {
                    confidence = confidence.min(p.outcome_cap);
                }
                notes.push(format!(
                    "{} Outcome {} without a confirmed next step; proceed is not supported.",
                    GATE_NOTE_MARKER, outcome
                ));
            }
        }

        // 3. similarity gate
        let aggregate = similarity.aggregate();
        if similarity.degraded || aggregate < p.low_similarity_threshold {
            let label = if similarity.degraded {
                format!("{:.2}, embeddings unavailable", aggregate)
            } else {
                format!("{:.2}", aggregate)
            };
            let tension = if outcome.is_positive() {
                format!(" is in tension with the {} outcome", outcome)
            } else {
                String::new()
            };

            if mutual_next_step {
                confidence = confidence.min(if decision == DecisionKind::Proceed {
                    p.low_similarity_proceed_cap
                } else {
                    p.low_similarity_cap
                });
                notes.push(format!(
                    "{} Low similarity ({}){}; next step confirmed by both sides, confidence capped.",
                    GATE_NOTE_MARKER, label, tension
                ));
            } else {
                if decision == DecisionKind::Proceed {
                    decision = DecisionKind::MoreInfo;
                    confidence = confidence.min(p.low_similarity_downgrade_cap);
                } else {
                    confidence = confidence.min(p.low_similarity_cap);
                }
                notes.push(format!(
                    "{} Low similarity ({}){}; proceed requires an explicitly confirmed next step.",
                    GATE_NOTE_MARKER, label, tension
                ));
            }
        } else if aggregate < p.moderate_similarity_threshold {
            // 4. moderate band
            confidence = confidence.min(p.moderate_cap(aggregate));
        }

        // 5. pass-through
        self.finish(decision, &proposed.rationale, confidence, &notes)
    }

    fn finish(
        &self,
        decision: DecisionKind,
        rationale: &str,
        confidence: f64,
        notes: &[String],
    ) -> Decision {
        let body = strip_gate_notes(rationale);
        let notes = notes.join(" ");
        let budget = self
            .policy
            .max_rationale_words
            .saturating_sub(word_count(&notes));

        let rationale = [bound_words(body, budget), notes]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Decision {
            decision,
            rationale,
            confidence: round2(clamp_confidence(confidence)),
        }
    }
}

/// Reviewer text with any previously appended gate notes removed
fn strip_gate_notes(rationale: &str) -> &str {
    rationale
        .split(GATE_NOTE_MARKER)
        .next()
        .unwrap_or_default()
        .trim()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Phase;
    use crate::persona::Speaker;
    use crate::similarity::SimilaritySignals;

    fn sim(aggregate: f64) -> SimilarityReport {
        SimilarityReport::measured(SimilaritySignals::from_cosines(aggregate, aggregate))
    }

    fn proceed(confidence: f64) -> Decision {
        Decision::new(DecisionKind::Proceed, "Strong overlap on logistics.", confidence)
    }

    fn gate() -> DecisionGate {
        DecisionGate::default()
    }

    #[test]
    fn test_not_a_fit_forced_regardless_of_inputs() {
        for kind in [DecisionKind::Proceed, DecisionKind::MoreInfo, DecisionKind::NotAFit] {
            for aggregate in [0.0, 0.2, 0.4, 0.9] {
                for mutual in [true, false] {
                    let d = gate().apply_with(
                        &Decision::new(kind, "r", 0.95),
                        Outcome::NotAFit,
                        &sim(aggregate),
                        mutual,
                    );
                    assert_eq!(d.decision, DecisionKind::NotAFit);
                    assert!(d.confidence <= 0.4);
                }
            }
        }
    }

    #[test]
    fn test_outcome_gate_downgrades_proceed() {
        let d = gate().apply_with(&proceed(0.9), Outcome::FollowUpLater, &sim(0.8), false);
        assert_eq!(d.decision, DecisionKind::MoreInfo);
        assert_eq!(d.confidence, 0.55);
        assert!(d.rationale.contains("proceed is not supported"));
    }

    #[test]
    fn test_outcome_gate_allows_proceed_with_mutual_step() {
        let d = gate().apply_with(&proceed(0.9), Outcome::NeedsMoreInfo, &sim(0.8), true);
        assert_eq!(d.decision, DecisionKind::Proceed);
        assert_eq!(d.confidence, 0.65);
    }

    #[test]
    fn test_low_similarity_downgrades_and_states_tension() {
        let d = gate().apply_with(&proceed(0.9), Outcome::InterestedNextSteps, &sim(0.2), false);
        assert_eq!(d.decision, DecisionKind::MoreInfo);
        assert_eq!(d.confidence, 0.45);
        assert!(d.rationale.contains("Low similarity (0.20)"));
        assert!(d.rationale.contains("tension with the interested_next_steps outcome"));
    }

    #[test]
    fn test_low_similarity_keeps_proceed_with_mutual_step() {
        let d = gate().apply_with(&proceed(0.9), Outcome::MutualInterest, &sim(0.2), true);
        assert_eq!(d.decision, DecisionKind::Proceed);
        assert_eq!(d.confidence, 0.6);
    }

    #[test]
    fn test_degraded_similarity_gates_like_low() {
        let d = gate().apply_with(
            &proceed(0.9),
            Outcome::MutualInterest,
            &SimilarityReport::degraded(),
            false,
        );
        assert_eq!(d.decision, DecisionKind::MoreInfo);
        assert!(d.rationale.contains("embeddings unavailable"));
    }

    #[test]
    fn test_moderate_band_scales_confidence() {
        let low = gate().apply_with(&proceed(1.0), Outcome::MutualInterest, &sim(0.35), false);
        let high = gate().apply_with(&proceed(1.0), Outcome::MutualInterest, &sim(0.49), false);
        assert_eq!(low.decision, DecisionKind::Proceed);
        assert_eq!(low.confidence, 0.6);
        assert!(high.confidence > low.confidence);
        assert!(high.confidence < 0.9);
    }

    #[test]
    fn test_pass_through_for_high_similarity() {
        let d = gate().apply_with(&proceed(0.87), Outcome::MutualInterest, &sim(0.7), false);
        assert_eq!(d.decision, DecisionKind::Proceed);
        assert_eq!(d.confidence, 0.87);
        assert_eq!(d.rationale, "Strong overlap on logistics.");
    }

    #[test]
    fn test_rationale_is_bounded() {
        let long = "word ".repeat(200);
        let d = gate().apply_with(
            &Decision::new(DecisionKind::MoreInfo, long, 0.5),
            Outcome::NeedsMoreInfo,
            &sim(0.1),
            false,
        );
        assert!(word_count(&d.rationale) <= 80);
        assert!(d.rationale.contains(GATE_NOTE_MARKER));
    }

    #[test]
    fn test_gate_is_idempotent() {
        let cases = [
            (Outcome::NotAFit, 0.9),
            (Outcome::NeedsMoreInfo, 0.3),
            (Outcome::FollowUpLater, 0.42),
            (Outcome::InterestedNextSteps, 0.2),
            (Outcome::MutualInterest, 0.37),
            (Outcome::MutualInterest, 0.8),
        ];
        for (outcome, aggregate) in cases {
            for mutual in [true, false] {
                let once = gate().apply_with(&proceed(0.777), outcome, &sim(aggregate), mutual);
                let twice = gate().apply_with(&once, outcome, &sim(aggregate), mutual);
                assert_eq!(once, twice, "{outcome} at {aggregate} mutual={mutual}");
            }
        }
    }

    #[test]
    fn test_mutual_next_step_detection() {
        let lexicon = Lexicon::default();
        let turns = vec![
            Turn::new(Speaker::A, "Could we schedule a demo next week?", Phase::DeepDive),
            Turn::new(Speaker::B, "Sounds good, Tuesday works.", Phase::Closing),
        ];
        assert!(has_mutual_next_step(&turns, &lexicon));

        let same_speaker = vec![
            Turn::new(Speaker::A, "Could we schedule a demo?", Phase::DeepDive),
            Turn::new(Speaker::A, "Sounds good.", Phase::Closing),
        ];
        assert!(!has_mutual_next_step(&same_speaker, &lexicon));

        let no_ack = vec![
            Turn::new(Speaker::A, "Could we schedule a demo?", Phase::DeepDive),
            Turn::new(Speaker::B, "What would it cover?", Phase::Closing),
        ];
        assert!(!has_mutual_next_step(&no_ack, &lexicon));
    }

    fn pleasantries_then_offers() -> Vec<Turn> {
        vec![
            Turn::new(Speaker::A, "Hi, nice to meet you.", Phase::Opening),
            Turn::new(
                Speaker::B,
                "Great to meet you too. What are you building?",
                Phase::Discovery,
            ),
            Turn::new(Speaker::A, "I'll send the deck tonight.", Phase::DeepDive),
            Turn::new(Speaker::B, "We could run a pilot in Q3.", Phase::Closing),
        ]
    }

    #[test]
    fn test_greeting_exchange_is_not_a_next_step() {
        assert!(!has_mutual_next_step(
            &pleasantries_then_offers(),
            &Lexicon::default()
        ));

        let counter = vec![
            Turn::new(Speaker::A, "Can we schedule a demo?", Phase::DeepDive),
            Turn::new(Speaker::B, "Great, I'll send the deck first.", Phase::Closing),
        ];
        assert!(!has_mutual_next_step(&counter, &Lexicon::default()));
    }

    #[test]
    fn test_low_similarity_with_pleasantries_downgrades_proceed() {
        let d = DecisionGate::default().apply(
            &proceed(0.9),
            Outcome::InterestedNextSteps,
            &sim(0.2),
            &pleasantries_then_offers(),
        );
        assert_eq!(d.decision, DecisionKind::MoreInfo);
        assert_eq!(d.confidence, 0.45);
        assert!(!d.rationale.contains("confirmed by both sides"));
    }

    #[test]
    fn test_policy_validation() {
        assert!(GatePolicy::default().validate().is_ok());
        let bad = GatePolicy {
            low_similarity_threshold: 0.6,
            ..GatePolicy::default()
        };
        assert!(bad.validate().is_err());
    }
}
