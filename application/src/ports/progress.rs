//! Progress notification port
//!
//! Defines the interface for reporting progress while matches run.

use matchmaker_domain::{Decision, MatchReport, Phase, SimilarityReport, TerminationReason, Turn};

/// Callback for progress updates during a match
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called before the first turn of a conversation
    fn on_match_start(&self, persona_1: &str, persona_2: &str, max_turns: usize);

    /// Called after each accepted turn
    fn on_turn(&self, turn: &Turn, turn_index: usize, max_turns: usize);

    /// Called when the conversation ends
    fn on_conversation_end(&self, reason: &TerminationReason);

    /// Called once the full report is ready
    fn on_match_complete(&self, report: &MatchReport);

    /// Called when the conversation moves into a later phase
    fn on_phase_change(&self, _from: Phase, _to: Phase) {}

    /// Called when a turn attempt failed and is being retried
    fn on_turn_retry(&self, _turn_index: usize, _error: &str) {}

    fn on_similarity(&self, _similarity: &SimilarityReport) {}

    fn on_decision(&self, _decision: &Decision) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_match_start(&self, _persona_1: &str, _persona_2: &str, _max_turns: usize) {}
    fn on_turn(&self, _turn: &Turn, _turn_index: usize, _max_turns: usize) {}
    fn on_conversation_end(&self, _reason: &TerminationReason) {}
    fn on_match_complete(&self, _report: &MatchReport) {}
}
