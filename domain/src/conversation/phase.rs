//! Conversation phases and the pure phase schedule.

use serde::{Deserialize, Serialize};

/// Coarse stage of a conversation.
///
/// Variants are declared in their total order, so the derived `Ord` is the
/// progression order: `Opening < Discovery < DeepDive < Closing < Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Opening,
    Discovery,
    DeepDive,
    Closing,
    Ended,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Opening => "opening",
            Phase::Discovery => "discovery",
            Phase::DeepDive => "deep_dive",
            Phase::Closing => "closing",
            Phase::Ended => "ended",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Opening => "Opening",
            Phase::Discovery => "Discovery",
            Phase::DeepDive => "Deep Dive",
            Phase::Closing => "Closing",
            Phase::Ended => "Ended",
        }
    }

    /// All phases in progression order
    pub fn ordered() -> [Phase; 5] {
        [
            Phase::Opening,
            Phase::Discovery,
            Phase::DeepDive,
            Phase::Closing,
            Phase::Ended,
        ]
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Phase for the turn at `turn_index`, ignoring history.
///
/// ```text
/// turn 0                         -> Opening
/// 1 .. discovery_end             -> Discovery
/// discovery_end .. closing_start -> DeepDive
/// closing_start .. max_turns     -> Closing
/// ```
///
/// `closing_start = max_turns - closing_grace`; the non-closing region after
/// the opening is split in half, with Discovery taking the extra turn when
/// the region is odd.
///
/// ```
/// use matchmaker_domain::conversation::phase::{phase_for_turn, Phase};
///
/// let phases: Vec<_> = (0..4).map(|t| phase_for_turn(t, 4, 1)).collect();
/// assert_eq!(phases, vec![Phase::Opening, Phase::Discovery, Phase::DeepDive, Phase::Closing]);
/// ```
pub fn phase_for_turn(turn_index: usize, max_turns: usize, closing_grace: usize) -> Phase {
    if turn_index == 0 {
        return Phase::Opening;
    }

    let closing_start = max_turns.saturating_sub(closing_grace);
    if turn_index >= closing_start {
        return Phase::Closing;
    }

    let middle = closing_start - 1;
    let discovery_end = 1 + middle.div_ceil(2);
    if turn_index < discovery_end {
        Phase::Discovery
    } else {
        Phase::DeepDive
    }
}

/// Phase for the next turn given the phase reached so far.
///
/// Never returns an earlier phase than `current`.
pub fn next_phase(current: Phase, turn_index: usize, max_turns: usize, closing_grace: usize) -> Phase {
    current.max(phase_for_turn(turn_index, max_turns, closing_grace))
}
