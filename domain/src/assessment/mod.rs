//! Assessment of a finished conversation
//!
//! - [`lexicon`]: versioned phrase lists and matching
//! - [`outcome`]: rule-ordered [`OutcomeClassifier`]
//! - [`decision`]: [`Decision`] value objects
//! - [`gate`]: [`DecisionGate`], the policy that constrains reviewer proposals
//! - [`parsing`]: reviewer response extraction

pub mod decision;
pub mod gate;
pub mod lexicon;
pub mod outcome;
pub mod parsing;

pub use decision::{Decision, DecisionKind, ProposedDecision, clamp_confidence};
pub use gate::{DecisionGate, GATE_NOTE_MARKER, GatePolicy, has_mutual_next_step};
pub use lexicon::{CommitmentPhrases, Lexicon, NextStepKind};
pub use outcome::{Classification, ClassificationBasis, Outcome, OutcomeClassifier};
pub use parsing::parse_reviewer_response;
