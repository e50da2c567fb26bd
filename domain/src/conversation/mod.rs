//! Conversation domain
//!
//! The phase state machine that paces a two-party dialogue:
//!
//! ```text
//! OPENING ──► DISCOVERY ──► DEEP_DIVE ──► CLOSING ──► ENDED
//!   t=0       first half     second half   last          max_turns reached,
//!             of the middle  of the middle closing_grace mutual closure,
//!                                          turns         mismatch, failure
//! ```
//!
//! - [`phase`]: phase enum and the pure phase schedule
//! - [`turn`]: append-only transcript entries
//! - [`state`]: [`ConversationState`](state::ConversationState), the single-writer state machine
//! - [`metrics`]: derived metrics snapshot

pub mod metrics;
pub mod phase;
pub mod state;
pub mod turn;

pub use metrics::Metrics;
pub use phase::{Phase, next_phase, phase_for_turn};
pub use state::{ConversationConfig, ConversationState, TerminationReason, TurnPlan};
pub use turn::{Turn, recent_turns};
