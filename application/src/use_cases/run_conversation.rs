//! Run Conversation use case
//!
//! Drives one two-party conversation through the phase state machine:
//! plan the next turn, ask the generator, validate the message, advance the
//! state, repeat until a terminal condition.
//!
//! A failed turn (error, timeout, empty or oversized message) is retried
//! once with an abbreviated context. A second failure ends the conversation
//! with `generation_failed`; every accepted turn is kept.

use crate::config::EngineParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::ProgressNotifier;
use crate::ports::turn_generator::{GenerationError, TurnGenerator, TurnRequest};
use crate::use_cases::run_match::RunMatchError;
use matchmaker_domain::conversation::recent_turns;
use matchmaker_domain::core::string::{single_line, truncate};
use matchmaker_domain::{
    ConversationConfig, ConversationState, Lexicon, Persona, Speaker, TerminationReason,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Longest turn snippet written to the operation log (bytes)
const LOG_SNIPPET_BYTES: usize = 400;

/// Input for the RunConversation use case
#[derive(Debug, Clone)]
pub struct RunConversationInput {
    pub persona_1: Persona,
    pub persona_2: Persona,
    pub config: ConversationConfig,
}

/// Use case for running one conversation
pub struct RunConversationUseCase {
    generator: Arc<dyn TurnGenerator>,
    logger: Arc<dyn ConversationLogger>,
    params: EngineParams,
}

impl RunConversationUseCase {
    pub fn new(
        generator: Arc<dyn TurnGenerator>,
        logger: Arc<dyn ConversationLogger>,
        params: EngineParams,
    ) -> Self {
        Self {
            generator,
            logger,
            params,
        }
    }

    /// Run to completion.
    ///
    /// Only invalid configuration is an error; generation failures and
    /// cancellation end the conversation and are recorded in its
    /// termination reason.
    pub async fn execute(
        &self,
        input: &RunConversationInput,
        lexicon: &Lexicon,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<ConversationState, RunMatchError> {
        let mut state = ConversationState::new(input.config.clone())?;
        let pair = pair_label(&input.persona_1, &input.persona_2);

        info!(
            "Starting conversation {} (max_turns={}, closing_grace={})",
            pair,
            state.max_turns(),
            state.closing_grace()
        );
        self.logger.log(ConversationEvent::new(
            "conversation_start",
            json!({
                "persona_1": input.persona_1.id(),
                "persona_2": input.persona_2.id(),
                "config": &input.config,
            }),
        ));

        while let Some(plan) = state.plan_next() {
            if cancel.is_cancelled() {
                warn!("Conversation {} aborted before turn {}", pair, plan.turn_index);
                state.end(TerminationReason::Aborted);
                break;
            }

            let (persona, counterpart) = match plan.speaker {
                Speaker::A => (&input.persona_1, &input.persona_2),
                Speaker::B => (&input.persona_2, &input.persona_1),
            };
            let history = recent_turns(state.turns(), state.config().context_window);
            let request = TurnRequest::new(plan, persona, counterpart, history);

            let max_chars = state.config().max_message_chars;
            let message = match self.generate(&request, max_chars).await {
                Ok(message) => message,
                Err(first) => {
                    warn!(
                        "Turn {} ({}) failed: {}; retrying with abbreviated context",
                        plan.turn_index, plan.speaker, first
                    );
                    progress.on_turn_retry(plan.turn_index, &first.to_string());
                    self.logger.log(ConversationEvent::new(
                        "turn_retry",
                        json!({
                            "pair": &pair,
                            "turn_index": plan.turn_index,
                            "speaker": plan.speaker,
                            "error": first.to_string(),
                        }),
                    ));

                    if cancel.is_cancelled() {
                        warn!(
                            "Conversation {} aborted before retrying turn {}",
                            pair, plan.turn_index
                        );
                        state.end(TerminationReason::Aborted);
                        break;
                    }

                    let retry = request.abbreviated(self.params.retry_context_turns);
                    match self.generate(&retry, max_chars).await {
                        Ok(message) => message,
                        Err(second) => {
                            warn!(
                                "Turn {} ({}) failed again: {}; truncating conversation",
                                plan.turn_index, plan.speaker, second
                            );
                            state.end(TerminationReason::GenerationFailed {
                                error: second.to_string(),
                            });
                            break;
                        }
                    }
                }
            };

            let previous_phase = state.current_phase();
            state.advance(message, lexicon)?;

            if let Some(turn) = state.turns().last() {
                debug!(
                    "turn {}/{} {} [{}] {}",
                    plan.turn_index + 1,
                    state.max_turns(),
                    turn.speaker,
                    turn.phase.as_str(),
                    truncate(&single_line(&turn.message), LOG_SNIPPET_BYTES)
                );
                if turn.phase > previous_phase && plan.turn_index > 0 {
                    info!("Phase {} -> {}", previous_phase.as_str(), turn.phase.as_str());
                    progress.on_phase_change(previous_phase, turn.phase);
                }
                progress.on_turn(turn, plan.turn_index, state.max_turns());
                self.logger.log(ConversationEvent::new(
                    "turn",
                    json!({
                        "pair": &pair,
                        "turn_index": plan.turn_index,
                        "turn": turn,
                    }),
                ));
            }
        }

        let reason = state
            .termination()
            .cloned()
            .unwrap_or(TerminationReason::MaxTurns);
        info!(
            "Conversation {} ended after {} turns: {}",
            pair,
            state.turn_index(),
            reason
        );
        progress.on_conversation_end(&reason);
        self.logger.log(ConversationEvent::new(
            "conversation_end",
            json!({
                "persona_1": input.persona_1.id(),
                "persona_2": input.persona_2.id(),
                "turns": state.turn_index(),
                "termination": reason,
            }),
        ));

        Ok(state)
    }

    /// One bounded generation attempt, with message validation.
    ///
    /// Cancellation is observed between attempts only; a call in flight runs
    /// to completion or timeout.
    async fn generate(
        &self,
        request: &TurnRequest,
        max_chars: usize,
    ) -> Result<String, GenerationError> {
        let raw = tokio::time::timeout(
            self.params.turn_timeout,
            self.generator.generate_turn(request),
        )
        .await
        .map_err(|_| GenerationError::Timeout)??;

        let message = raw.trim();
        if message.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        let len = message.chars().count();
        if len > max_chars {
            return Err(GenerationError::TooLong {
                len,
                max: max_chars,
            });
        }
        Ok(message.to_string())
    }
}

pub(crate) fn pair_label(persona_1: &Persona, persona_2: &Persona) -> String {
    format!("{} vs {}", persona_1.id(), persona_2.id())
}
