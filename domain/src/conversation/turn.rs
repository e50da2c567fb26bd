//! Turn entity - one generated utterance.

use super::phase::Phase;
use crate::persona::Speaker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One utterance by one party, tagged with the phase active when it was
/// generated. Appended once to the transcript and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub message: String,
    pub phase: Phase,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(speaker: Speaker, message: impl Into<String>, phase: Phase) -> Self {
        Self::at(speaker, message, phase, Utc::now())
    }

    /// Create a turn with an explicit timestamp
    pub fn at(
        speaker: Speaker,
        message: impl Into<String>,
        phase: Phase,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            speaker,
            message: message.into(),
            phase,
            timestamp,
        }
    }

    /// Message length in characters
    pub fn len_chars(&self) -> usize {
        self.message.chars().count()
    }
}

/// Most recent `window` turns of a transcript (all of them when `None`).
pub fn recent_turns(turns: &[Turn], window: Option<usize>) -> &[Turn] {
    match window {
        Some(n) if n < turns.len() => &turns[turns.len() - n..],
        _ => turns,
    }
}
