//! Conversation state machine.
//!
//! [`ConversationState`] owns the transcript, the current phase and the turn
//! counter for one conversation. The orchestration loop asks it for the
//! [`TurnPlan`] of the next turn, obtains an utterance from outside, and hands
//! the utterance back through [`ConversationState::advance`], which appends
//! the turn and evaluates termination.
//!
//! ```text
//! plan_next() ──► generate utterance ──► advance(message) ──► ended? ──► stop
//!      ▲                                                         │
//!      └─────────────────────────── no ◄─────────────────────────┘
//! ```

use super::metrics::Metrics;
use super::phase::{Phase, next_phase};
use super::turn::Turn;
use crate::assessment::lexicon::Lexicon;
use crate::core::error::DomainError;
use crate::persona::Speaker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pacing parameters for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Total number of turns before the conversation is forced to end
    pub max_turns: usize,
    /// Number of final turns forced into the Closing phase
    pub closing_grace: usize,
    /// Who speaks first
    pub opener: Speaker,
    /// Most recent turns passed to the turn generator (`None` = all)
    pub context_window: Option<usize>,
    /// Utterances longer than this (in characters) are rejected
    pub max_message_chars: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            closing_grace: 2,
            opener: Speaker::A,
            context_window: None,
            max_message_chars: 4000,
        }
    }
}

impl ConversationConfig {
    pub fn new(max_turns: usize, closing_grace: usize) -> Self {
        Self {
            max_turns,
            closing_grace,
            ..Default::default()
        }
    }

    pub fn with_opener(mut self, opener: Speaker) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_context_window(mut self, window: Option<usize>) -> Self {
        self.context_window = window;
        self
    }

    pub fn with_max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_turns == 0 {
            return Err(DomainError::InvalidConfig(
                "max_turns must be at least 1".to_string(),
            ));
        }
        if self.closing_grace >= self.max_turns {
            return Err(DomainError::InvalidConfig(format!(
                "closing_grace ({}) must be smaller than max_turns ({})",
                self.closing_grace, self.max_turns
            )));
        }
        if self.context_window == Some(0) {
            return Err(DomainError::InvalidConfig(
                "context_window must be at least 1 when set".to_string(),
            ));
        }
        if self.max_message_chars == 0 {
            return Err(DomainError::InvalidConfig(
                "max_message_chars cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why a conversation reached [`Phase::Ended`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TerminationReason {
    /// The turn budget was exhausted
    MaxTurns,
    /// Both speakers signalled closure in consecutive Closing turns
    MutualClosure,
    /// A hard mismatch was stated mid-conversation
    Mismatch,
    /// Turn generation failed twice in a row
    GenerationFailed { error: String },
    /// The caller aborted between turns
    Aborted,
}

impl TerminationReason {
    /// Whether the transcript was cut short by a failure or an abort
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            TerminationReason::GenerationFailed { .. } | TerminationReason::Aborted
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::MaxTurns => "max_turns",
            TerminationReason::MutualClosure => "mutual_closure",
            TerminationReason::Mismatch => "mismatch",
            TerminationReason::GenerationFailed { .. } => "generation_failed",
            TerminationReason::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::GenerationFailed { error } => {
                write!(f, "generation_failed ({})", error)
            }
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// What the next turn will be: who speaks, and in which phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPlan {
    pub turn_index: usize,
    pub speaker: Speaker,
    pub phase: Phase,
}

/// Mutable state of one conversation (Entity)
///
/// Single owner: the orchestration loop. Invariants:
/// - `turn_index() == turns().len()`
/// - the phase never decreases
/// - speakers strictly alternate starting from the configured opener
#[derive(Debug, Clone)]
pub struct ConversationState {
    turns: Vec<Turn>,
    current_phase: Phase,
    config: ConversationConfig,
    termination: Option<TerminationReason>,
}

impl ConversationState {
    pub fn new(config: ConversationConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            turns: Vec::with_capacity(config.max_turns),
            current_phase: Phase::Opening,
            config,
            termination: None,
        })
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turn_index(&self) -> usize {
        self.turns.len()
    }

    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    pub fn max_turns(&self) -> usize {
        self.config.max_turns
    }

    pub fn closing_grace(&self) -> usize {
        self.config.closing_grace
    }

    pub fn termination(&self) -> Option<&TerminationReason> {
        self.termination.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        self.current_phase == Phase::Ended
    }

    /// Speaker for a given turn index (parity relative to the opener)
    pub fn speaker_for(&self, turn_index: usize) -> Speaker {
        if turn_index % 2 == 0 {
            self.config.opener
        } else {
            self.config.opener.other()
        }
    }

    /// Plan the next turn, or `None` once the conversation has ended.
    pub fn plan_next(&self) -> Option<TurnPlan> {
        if self.is_ended() {
            return None;
        }
        let turn_index = self.turn_index();
        Some(TurnPlan {
            turn_index,
            speaker: self.speaker_for(turn_index),
            phase: next_phase(
                self.current_phase,
                turn_index,
                self.config.max_turns,
                self.config.closing_grace,
            ),
        })
    }

    /// Append the next turn and evaluate termination.
    ///
    /// Returns the termination reason when this turn ended the conversation.
    pub fn advance(
        &mut self,
        message: impl Into<String>,
        lexicon: &Lexicon,
    ) -> Result<Option<TerminationReason>, DomainError> {
        self.advance_at(message, Utc::now(), lexicon)
    }

    /// [`advance`](Self::advance) with an explicit timestamp
    pub fn advance_at(
        &mut self,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        lexicon: &Lexicon,
    ) -> Result<Option<TerminationReason>, DomainError> {
        let plan = self.plan_next().ok_or(DomainError::ConversationEnded)?;

        self.turns
            .push(Turn::at(plan.speaker, message, plan.phase, timestamp));
        self.current_phase = plan.phase;

        let reason = self.evaluate_termination(lexicon);
        if let Some(reason) = &reason {
            self.end(reason.clone());
        }
        Ok(reason)
    }

    /// Force the conversation to end, keeping every turn appended so far.
    pub fn end(&mut self, reason: TerminationReason) {
        if self.is_ended() {
            return;
        }
        self.current_phase = Phase::Ended;
        self.termination = Some(reason);
    }

    fn evaluate_termination(&self, lexicon: &Lexicon) -> Option<TerminationReason> {
        if self.turn_index() >= self.config.max_turns {
            return Some(TerminationReason::MaxTurns);
        }

        let last = self.turns.last()?;
        if lexicon.has_disinterest(&last.message) {
            return Some(TerminationReason::Mismatch);
        }

        if let [previous, last] = &self.turns[self.turns.len().saturating_sub(2)..]
            && previous.phase == Phase::Closing
            && last.phase == Phase::Closing
            && previous.speaker != last.speaker
            && lexicon.has_closing_signal(&previous.message)
            && lexicon.has_closing_signal(&last.message)
        {
            return Some(TerminationReason::MutualClosure);
        }

        None
    }

    /// Recompute the metrics snapshot
    pub fn metrics(&self, lexicon: &Lexicon) -> Metrics {
        Metrics::from_turns(&self.turns, lexicon)
    }

    /// Consume the state, returning the transcript
    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}
