//! Derived, read-only metrics over a transcript.

use super::turn::Turn;
use crate::assessment::lexicon::Lexicon;
use crate::persona::Speaker;
use serde::{Deserialize, Serialize};

/// Snapshot of conversation metrics.
///
/// Always recomputed from the transcript; never updated in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub total_turns: usize,
    pub profile_1_turns: usize,
    pub profile_2_turns: usize,
    /// Mean message length in characters
    pub average_message_length: f64,
    /// Length of the last message in characters
    pub last_message_length: usize,
    pub commitment_hits: usize,
    pub disinterest_hits: usize,
    pub validation_request_hits: usize,
}

impl Metrics {
    pub fn from_turns(turns: &[Turn], lexicon: &Lexicon) -> Self {
        let total_turns = turns.len();
        let total_chars: usize = turns.iter().map(Turn::len_chars).sum();

        let average_message_length = if total_turns == 0 {
            0.0
        } else {
            total_chars as f64 / total_turns as f64
        };

        Self {
            total_turns,
            profile_1_turns: Self::count_for(turns, Speaker::A),
            profile_2_turns: Self::count_for(turns, Speaker::B),
            average_message_length,
            last_message_length: turns.last().map(Turn::len_chars).unwrap_or(0),
            commitment_hits: turns
                .iter()
                .map(|t| lexicon.commitment_hits(&t.message))
                .sum(),
            disinterest_hits: turns
                .iter()
                .map(|t| lexicon.disinterest_hits(&t.message))
                .sum(),
            validation_request_hits: turns
                .iter()
                .map(|t| lexicon.validation_hits(&t.message))
                .sum(),
        }
    }

    fn count_for(turns: &[Turn], speaker: Speaker) -> usize {
        turns.iter().filter(|t| t.speaker == speaker).count()
    }

    /// Messages sent by one speaker
    pub fn turns_by(&self, speaker: Speaker) -> usize {
        match speaker {
            Speaker::A => self.profile_1_turns,
            Speaker::B => self.profile_2_turns,
        }
    }
}
