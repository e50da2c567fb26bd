//! Score Similarity use case
//!
//! Embeds `[needs_1, personality_1, needs_2, personality_2]` in one call and
//! derives the directional cross-fit signals. Never fails: when embeddings
//! are unavailable the result is all zeros with the degraded flag set.

use crate::ports::embedder::{EmbeddingError, Embedder};
use matchmaker_domain::{Persona, PersonaEmbeddings, SimilarityReport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Use case for scoring one persona pair
pub struct ScoreSimilarityUseCase {
    embedder: Arc<dyn Embedder>,
    timeout: Duration,
}

impl ScoreSimilarityUseCase {
    pub fn new(embedder: Arc<dyn Embedder>, timeout: Duration) -> Self {
        Self { embedder, timeout }
    }

    pub async fn execute(&self, persona_1: &Persona, persona_2: &Persona) -> SimilarityReport {
        match self.embed(persona_1, persona_2).await {
            Ok(embeddings) => {
                let signals = embeddings.signals();
                info!(
                    "Similarity {} vs {}: aggregate={:.3} n1~p2={:.3} n2~p1={:.3}",
                    persona_1.id(),
                    persona_2.id(),
                    signals.aggregate,
                    signals.needs1_vs_personality2,
                    signals.needs2_vs_personality1
                );
                SimilarityReport::measured(signals)
            }
            Err(e) => {
                warn!(
                    "Similarity unavailable for {} vs {}; defaulting to 0.0 ({})",
                    persona_1.id(),
                    persona_2.id(),
                    e
                );
                SimilarityReport::degraded()
            }
        }
    }

    async fn embed(
        &self,
        persona_1: &Persona,
        persona_2: &Persona,
    ) -> Result<PersonaEmbeddings, EmbeddingError> {
        let texts = [
            persona_1.needs(),
            persona_1.personality(),
            persona_2.needs(),
            persona_2.personality(),
        ]
        .map(str::to_string);

        let vectors = tokio::time::timeout(self.timeout, self.embedder.embed(&texts))
            .await
            .map_err(|_| EmbeddingError::Timeout)??;

        let count = vectors.len();
        PersonaEmbeddings::from_vectors(vectors).ok_or_else(|| {
            EmbeddingError::InvalidResponse(format!("expected 4 vectors, got {}", count))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedEmbedder {
        result: Mutex<Option<Result<Vec<Vec<f32>>, EmbeddingError>>>,
        texts: Mutex<Vec<String>>,
    }

    impl FixedEmbedder {
        fn new(result: Result<Vec<Vec<f32>>, EmbeddingError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                texts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.texts.lock().unwrap().extend(texts.iter().cloned());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(EmbeddingError::Unavailable("used twice".into())))
        }
    }

    struct HangingEmbedder;

    #[async_trait]
    impl Embedder for HangingEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            std::future::pending().await
        }
    }

    fn personas() -> (Persona, Persona) {
        (
            Persona::new("alice", "needs-a", "personality-a").unwrap(),
            Persona::new("bob", "needs-b", "personality-b").unwrap(),
        )
    }

    fn scorer(embedder: Arc<dyn Embedder>) -> ScoreSimilarityUseCase {
        ScoreSimilarityUseCase::new(embedder, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_measured_signals_use_cross_pairs() {
        let embedder = Arc::new(FixedEmbedder::new(Ok(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 0.0],
        ])));
        let (a, b) = personas();
        let report = scorer(embedder.clone()).execute(&a, &b).await;

        assert!(!report.degraded);
        assert!((report.signals.needs1_vs_personality2 - 1.0).abs() < 1e-9);
        assert!((report.signals.needs2_vs_personality1 - 0.5f64.sqrt()).abs() < 1e-6);
        assert_eq!(
            *embedder.texts.lock().unwrap(),
            vec!["needs-a", "personality-a", "needs-b", "personality-b"]
        );
    }

    #[tokio::test]
    async fn test_failure_degrades_to_zero() {
        let (a, b) = personas();
        let report = scorer(Arc::new(FixedEmbedder::new(Err(EmbeddingError::Unavailable(
            "no key".into(),
        )))))
        .execute(&a, &b)
        .await;
        assert_eq!(report, SimilarityReport::degraded());
    }

    #[tokio::test]
    async fn test_wrong_vector_count_degrades() {
        let (a, b) = personas();
        let report = scorer(Arc::new(FixedEmbedder::new(Ok(vec![vec![1.0]; 3]))))
            .execute(&a, &b)
            .await;
        assert!(report.degraded);
        assert_eq!(report.aggregate(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_degrades() {
        let (a, b) = personas();
        let report = scorer(Arc::new(HangingEmbedder)).execute(&a, &b).await;
        assert!(report.degraded);
    }
}
