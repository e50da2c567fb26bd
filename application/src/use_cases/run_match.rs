//! Run Match use case
//!
//! Orchestrates the full matching flow for one persona pair:
//!
//! 1. validate configuration (fails before any turn)
//! 2. run the conversation and score similarity, concurrently
//! 3. classify the outcome
//! 4. ask the reviewer for a proposal (fallback on failure)
//! 5. gate the proposal into the final decision

use crate::config::MatchConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::embedder::Embedder;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::reviewer::{ReviewError, ReviewRequest, Reviewer};
use crate::ports::turn_generator::TurnGenerator;
use crate::use_cases::run_conversation::{
    RunConversationInput, RunConversationUseCase, pair_label,
};
use crate::use_cases::score_similarity::ScoreSimilarityUseCase;
use chrono::Utc;
use matchmaker_domain::{
    Decision, DecisionGate, DomainError, MatchReport, OutcomeClassifier, Persona,
    ProposedDecision, RunStatus, TerminationReason,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Rationale used when the reviewer produced nothing usable
const REVIEWER_FALLBACK_RATIONALE: &str =
    "Reviewer unavailable; defaulting to a conservative request for more information.";

/// Errors that stop a match before it produces a report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunMatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),
}

/// Input for the RunMatch use case
#[derive(Debug, Clone)]
pub struct RunMatchInput {
    pub persona_1: Persona,
    pub persona_2: Persona,
}

impl RunMatchInput {
    pub fn new(persona_1: Persona, persona_2: Persona) -> Self {
        Self {
            persona_1,
            persona_2,
        }
    }

    pub fn label(&self) -> String {
        pair_label(&self.persona_1, &self.persona_2)
    }
}

/// Use case for matching one persona pair
pub struct RunMatchUseCase {
    conversation: RunConversationUseCase,
    similarity: ScoreSimilarityUseCase,
    reviewer: Arc<dyn Reviewer>,
    logger: Arc<dyn ConversationLogger>,
    classifier: OutcomeClassifier,
    gate: DecisionGate,
    config: MatchConfig,
}

impl RunMatchUseCase {
    pub fn new(
        generator: Arc<dyn TurnGenerator>,
        embedder: Arc<dyn Embedder>,
        reviewer: Arc<dyn Reviewer>,
        logger: Arc<dyn ConversationLogger>,
        config: MatchConfig,
    ) -> Self {
        Self {
            conversation: RunConversationUseCase::new(
                generator,
                logger.clone(),
                config.params.clone(),
            ),
            similarity: ScoreSimilarityUseCase::new(embedder, config.params.embedding_timeout),
            reviewer,
            logger,
            classifier: OutcomeClassifier::new(config.lexicon.clone()),
            gate: DecisionGate::new(config.gate.clone(), config.lexicon.clone()),
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunMatchInput) -> Result<MatchReport, RunMatchError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and cancellation
    pub async fn execute_with_progress(
        &self,
        input: RunMatchInput,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<MatchReport, RunMatchError> {
        self.config.validate()?;

        let RunMatchInput {
            persona_1,
            persona_2,
        } = input;
        info!("Starting match {}", pair_label(&persona_1, &persona_2));
        progress.on_match_start(
            persona_1.id(),
            persona_2.id(),
            self.config.conversation.max_turns,
        );

        let conversation_input = RunConversationInput {
            persona_1: persona_1.clone(),
            persona_2: persona_2.clone(),
            config: self.config.conversation.clone(),
        };
        let lexicon = self.classifier.lexicon();

        let (state, similarity) = tokio::join!(
            self.conversation
                .execute(&conversation_input, lexicon, progress, cancel),
            self.similarity.execute(&persona_1, &persona_2),
        );
        let state = state?;

        progress.on_similarity(&similarity);
        self.logger.log(ConversationEvent::new(
            "similarity",
            json!({
                "persona_1": persona_1.id(),
                "persona_2": persona_2.id(),
                "signals": similarity.signals,
                "degraded": similarity.degraded,
            }),
        ));

        let metrics = state.metrics(lexicon);
        let classification = self.classifier.classify(
            state.turns(),
            &metrics,
            state.current_phase(),
            state.termination(),
        );
        info!(
            "Outcome for {}: {} ({:?})",
            pair_label(&persona_1, &persona_2),
            classification.outcome,
            classification.basis
        );

        let request = ReviewRequest {
            persona_1: persona_1.clone(),
            persona_2: persona_2.clone(),
            signals: similarity.signals,
            outcome: classification.outcome,
            transcript: state.turns().to_vec(),
        };
        let proposed = self.propose(&request).await;

        let decision = self.gate.apply(
            &proposed,
            classification.outcome,
            &similarity,
            state.turns(),
        );
        info!(
            "Decision for {}: {} (confidence {:.2}, proposed {} {:.2})",
            pair_label(&persona_1, &persona_2),
            decision.decision,
            decision.confidence,
            proposed.decision,
            proposed.confidence
        );
        progress.on_decision(&decision);
        self.logger.log(ConversationEvent::new(
            "decision",
            json!({
                "persona_1": persona_1.id(),
                "persona_2": persona_2.id(),
                "outcome": classification.outcome,
                "proposed": &proposed,
                "final": &decision,
            }),
        ));

        let termination = state
            .termination()
            .cloned()
            .unwrap_or(TerminationReason::MaxTurns);
        let report = MatchReport {
            persona_1: persona_1.id().to_string(),
            persona_2: persona_2.id().to_string(),
            status: RunStatus::from_termination(&termination),
            termination,
            outcome: classification.outcome,
            outcome_basis: classification.basis,
            final_metrics: metrics,
            conversation: state.into_turns(),
            similarity_signals: similarity.signals,
            similarity_degraded: similarity.degraded,
            proposed_decision: proposed,
            chat_decision: decision,
            lexicon_version: lexicon.version.clone(),
            generated_at: Utc::now(),
        };
        progress.on_match_complete(&report);
        Ok(report)
    }

    /// Reviewer proposal bounded by the review timeout, or the fallback
    async fn propose(&self, request: &ReviewRequest) -> ProposedDecision {
        let result = tokio::time::timeout(
            self.config.params.review_timeout,
            self.reviewer.review(request),
        )
        .await
        .unwrap_or(Err(ReviewError::Timeout));

        match result {
            Ok(proposed) => proposed,
            Err(e) => {
                warn!("Reviewer failed ({}); using fallback proposal", e);
                Decision::fallback(REVIEWER_FALLBACK_RATIONALE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineParams;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::embedder::EmbeddingError;
    use crate::ports::turn_generator::{GenerationError, TurnRequest};
    use async_trait::async_trait;
    use matchmaker_domain::{
        ClassificationBasis, ConversationConfig, DecisionKind, Outcome, Speaker,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<&str, GenerationError>>) -> Self {
            Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait]
    impl TurnGenerator for ScriptedGenerator {
        async fn generate_turn(&self, _request: &TurnRequest) -> Result<String, GenerationError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Provider("script exhausted".into())))
        }
    }

    /// Returns vectors whose cross cosines both equal `aggregate`
    struct AlignedEmbedder {
        aggregate: f32,
    }

    #[async_trait]
    impl Embedder for AlignedEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            let x = self.aggregate;
            let y = (1.0 - x * x).sqrt();
            Ok(vec![vec![1.0, 0.0], vec![x, y], vec![1.0, 0.0], vec![x, y]])
        }
    }

    struct DownEmbedder;

    #[async_trait]
    impl Embedder for DownEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Err(EmbeddingError::Unavailable("offline".into()))
        }
    }

    struct FixedReviewer {
        result: Result<ProposedDecision, ReviewError>,
        requests: Mutex<Vec<ReviewRequest>>,
    }

    impl FixedReviewer {
        fn new(result: Result<ProposedDecision, ReviewError>) -> Self {
            Self {
                result,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Reviewer for FixedReviewer {
        async fn review(&self, request: &ReviewRequest) -> Result<ProposedDecision, ReviewError> {
            self.requests.lock().unwrap().push(request.clone());
            self.result.clone()
        }
    }

    fn personas() -> RunMatchInput {
        RunMatchInput::new(
            Persona::new("alice", "Seed funding for a logistics app", "Direct").unwrap(),
            Persona::new("bob", "Early-stage logistics deals", "Curious").unwrap(),
        )
    }

    fn use_case(
        messages: Vec<Result<&str, GenerationError>>,
        embedder: Arc<dyn Embedder>,
        reviewer: Arc<dyn Reviewer>,
        conversation: ConversationConfig,
    ) -> RunMatchUseCase {
        RunMatchUseCase::new(
            Arc::new(ScriptedGenerator::new(messages)),
            embedder,
            reviewer,
            Arc::new(NoConversationLogger),
            MatchConfig::new(conversation).with_params(EngineParams::default()),
        )
    }

    fn proceed(confidence: f64) -> Result<ProposedDecision, ReviewError> {
        Ok(Decision::new(DecisionKind::Proceed, "Strong fit.", confidence))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_mutual_interest_end_to_end() {
        let reviewer = Arc::new(FixedReviewer::new(proceed(0.9)));
        let uc = use_case(
            vec![
                Ok("Hello, I run a logistics startup."),
                Ok("Nice to meet you, what do you need?"),
                Ok("Happy to schedule a follow-up call to go deeper."),
                Ok("Agreed, let's schedule a follow-up call next week."),
            ],
            Arc::new(AlignedEmbedder { aggregate: 0.8 }),
            reviewer.clone(),
            ConversationConfig::new(4, 1),
        );

        let report = uc.execute(personas()).await.unwrap();

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.termination, TerminationReason::MaxTurns);
        assert_eq!(report.outcome, Outcome::MutualInterest);
        assert_eq!(report.outcome_basis, ClassificationBasis::SharedNextStep);
        assert_eq!(report.conversation.len(), 4);
        assert_eq!(report.final_metrics.total_turns, 4);
        assert!(!report.similarity_degraded);
        assert!((report.similarity_signals.aggregate - 0.8).abs() < 1e-4);
        assert_eq!(report.chat_decision.decision, DecisionKind::Proceed);
        assert_eq!(report.chat_decision.confidence, 0.9);

        let requests = reviewer.requests.lock().unwrap();
        assert_eq!(requests[0].outcome, Outcome::MutualInterest);
        assert_eq!(requests[0].transcript.len(), 4);
    }

    #[tokio::test]
    async fn test_low_similarity_blocks_proceed_without_mutual_step() {
        // Pleasantries and one-sided offers, but nothing proposed and accepted
        let uc = use_case(
            vec![
                Ok("Hi, nice to meet you."),
                Ok("Great to meet you too. What are you building?"),
                Ok("I'll send the deck tonight."),
                Ok("We could run a pilot in Q3."),
            ],
            Arc::new(AlignedEmbedder { aggregate: 0.2 }),
            Arc::new(FixedReviewer::new(proceed(0.9))),
            ConversationConfig::new(4, 1),
        );

        let report = uc.execute(personas()).await.unwrap();

        assert_eq!(report.outcome, Outcome::InterestedNextSteps);
        assert_eq!(report.chat_decision.decision, DecisionKind::MoreInfo);
        assert!(report.chat_decision.confidence <= 0.45);
        assert!(report.chat_decision.rationale.contains("Low similarity"));
        assert!(!report.chat_decision.rationale.contains("confirmed by both sides"));
        assert_eq!(report.proposed_decision.decision, DecisionKind::Proceed);
    }

    #[tokio::test]
    async fn test_truncated_conversation_still_reports() {
        let uc = use_case(
            vec![
                Ok("Hello."),
                Ok("Hi."),
                Ok("Tell me more."),
                Err(GenerationError::Provider("down".into())),
                Err(GenerationError::Provider("still down".into())),
            ],
            Arc::new(AlignedEmbedder { aggregate: 0.7 }),
            Arc::new(FixedReviewer::new(proceed(0.8))),
            ConversationConfig::default(),
        );

        let report = uc.execute(personas()).await.unwrap();

        assert!(report.status.is_truncated());
        assert_eq!(report.conversation.len(), 3);
        assert_eq!(report.outcome, Outcome::NeedsMoreInfo);
        assert_eq!(report.chat_decision.decision, DecisionKind::MoreInfo);
        assert!(report.chat_decision.confidence <= 0.55);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "truncated");
        assert!(json["error"].as_str().unwrap().contains("still down"));
    }

    #[tokio::test]
    async fn test_reviewer_failure_uses_gated_fallback() {
        let uc = use_case(
            vec![Ok("Hello."), Ok("Hi."), Ok("Thanks."), Ok("Goodbye.")],
            Arc::new(DownEmbedder),
            Arc::new(FixedReviewer::new(Err(ReviewError::Provider("500".into())))),
            ConversationConfig::new(4, 1),
        );

        let report = uc.execute(personas()).await.unwrap();

        assert!(report.similarity_degraded);
        assert_eq!(report.outcome, Outcome::FollowUpLater);
        assert_eq!(report.proposed_decision, Decision::fallback(REVIEWER_FALLBACK_RATIONALE));
        assert_eq!(report.chat_decision.decision, DecisionKind::MoreInfo);
        assert_eq!(report.chat_decision.confidence, 0.3);
        assert!(report.chat_decision.rationale.contains("embeddings unavailable"));
    }

    #[tokio::test]
    async fn test_disinterest_forces_not_a_fit() {
        let uc = use_case(
            vec![Ok("Hello."), Ok("We are not interested, sorry.")],
            Arc::new(AlignedEmbedder { aggregate: 0.9 }),
            Arc::new(FixedReviewer::new(proceed(0.95))),
            ConversationConfig::default(),
        );

        let report = uc.execute(personas()).await.unwrap();

        assert_eq!(report.termination, TerminationReason::Mismatch);
        assert_eq!(report.outcome, Outcome::NotAFit);
        assert_eq!(report.chat_decision.decision, DecisionKind::NotAFit);
        assert!(report.chat_decision.confidence <= 0.4);
        assert_eq!(report.conversation[1].speaker, Speaker::B);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_any_turn() {
        let reviewer = Arc::new(FixedReviewer::new(proceed(0.9)));
        let uc = use_case(
            vec![],
            Arc::new(DownEmbedder),
            reviewer.clone(),
            ConversationConfig::new(0, 0),
        );

        let result = uc.execute(personas()).await;
        assert!(matches!(
            result,
            Err(RunMatchError::InvalidInput(DomainError::InvalidConfig(_)))
        ));
        assert!(reviewer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_match_is_truncated() {
        let uc = use_case(
            vec![Ok("Hello.")],
            Arc::new(AlignedEmbedder { aggregate: 0.6 }),
            Arc::new(FixedReviewer::new(proceed(0.9))),
            ConversationConfig::default(),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = uc
            .execute_with_progress(personas(), &NoProgress, &cancel)
            .await
            .unwrap();

        assert_eq!(report.termination, TerminationReason::Aborted);
        assert!(report.status.is_truncated());
        assert!(report.conversation.is_empty());
    }
}
