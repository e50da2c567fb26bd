//! Cross-fit similarity between two personas.
//!
//! Two directional scores are computed from embedding vectors:
//! `needs(1) ~ personality(2)` and `needs(2) ~ personality(1)`. Each is a
//! cosine clipped to [0, 1]; the aggregate is their unweighted mean.
//!
//! When embeddings are unavailable the scorer reports zeros with
//! `degraded = true`, which callers must not confuse with a genuine
//! zero-alignment pair.

use serde::{Deserialize, Serialize};

/// Directional similarity scores, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilaritySignals {
    pub needs1_vs_personality2: f64,
    pub needs2_vs_personality1: f64,
    pub aggregate: f64,
}

impl SimilaritySignals {
    /// Build signals from two raw cosines, clipping and averaging
    pub fn from_cosines(needs1_vs_personality2: f64, needs2_vs_personality1: f64) -> Self {
        let a = clip_unit(needs1_vs_personality2);
        let b = clip_unit(needs2_vs_personality1);
        Self {
            needs1_vs_personality2: a,
            needs2_vs_personality1: b,
            aggregate: (a + b) / 2.0,
        }
    }

    /// All-zero signals
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Similarity signals plus whether they came from the zero fallback
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub signals: SimilaritySignals,
    pub degraded: bool,
}

impl SimilarityReport {
    pub fn measured(signals: SimilaritySignals) -> Self {
        Self {
            signals,
            degraded: false,
        }
    }

    /// Fallback used when the embedding capability is unavailable
    pub fn degraded() -> Self {
        Self {
            signals: SimilaritySignals::zero(),
            degraded: true,
        }
    }

    pub fn aggregate(&self) -> f64 {
        self.signals.aggregate
    }
}

/// Embeddings of the four persona fields, in the order they are requested
/// from the embedding capability.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaEmbeddings {
    pub needs_1: Vec<f32>,
    pub personality_1: Vec<f32>,
    pub needs_2: Vec<f32>,
    pub personality_2: Vec<f32>,
}

impl PersonaEmbeddings {
    /// Take exactly four vectors: `[needs_1, personality_1, needs_2, personality_2]`
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Option<Self> {
        let [needs_1, personality_1, needs_2, personality_2]: [Vec<f32>; 4] =
            vectors.try_into().ok()?;
        Some(Self {
            needs_1,
            personality_1,
            needs_2,
            personality_2,
        })
    }

    pub fn signals(&self) -> SimilaritySignals {
        SimilaritySignals::from_cosines(
            cosine_similarity(&self.needs_1, &self.personality_2),
            cosine_similarity(&self.needs_2, &self.personality_1),
        )
    }
}

/// Cosine similarity of two vectors.
///
/// Returns 0.0 for zero-norm vectors or mismatched lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold((0.0f64, 0.0f64, 0.0f64), |acc, (x, y)| {
        let (x, y) = (*x as f64, *y as f64);
        (acc.0 + x * y, acc.1 + x * x, acc.2 + y * y)
    });

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn clip_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_basic() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_negative_cosine_clips_to_zero() {
        let s = SimilaritySignals::from_cosines(-0.4, 0.6);
        assert_eq!(s.needs1_vs_personality2, 0.0);
        assert_eq!(s.needs2_vs_personality1, 0.6);
        assert!((s.aggregate - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_signals_bounds_and_mean() {
        let samples = [(-1.0, -1.0), (0.0, 1.0), (1.5, 0.2), (f64::NAN, 0.5), (0.35, 0.35)];
        for (a, b) in samples {
            let s = SimilaritySignals::from_cosines(a, b);
            for v in [s.needs1_vs_personality2, s.needs2_vs_personality1, s.aggregate] {
                assert!((0.0..=1.0).contains(&v));
            }
            assert!(
                (s.aggregate - (s.needs1_vs_personality2 + s.needs2_vs_personality1) / 2.0).abs()
                    < 1e-12
            );
        }
    }

    #[test]
    fn test_persona_embeddings_cross_pairs() {
        let e = PersonaEmbeddings::from_vectors(vec![
            vec![1.0, 0.0], // needs_1
            vec![0.0, 1.0], // personality_1
            vec![0.0, 1.0], // needs_2
            vec![1.0, 0.0], // personality_2
        ])
        .unwrap();
        let s = e.signals();
        assert!((s.needs1_vs_personality2 - 1.0).abs() < 1e-9);
        assert!((s.needs2_vs_personality1 - 1.0).abs() < 1e-9);
        assert!((s.aggregate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_persona_embeddings_wrong_count() {
        assert!(PersonaEmbeddings::from_vectors(vec![vec![1.0]; 3]).is_none());
    }

    #[test]
    fn test_degraded_is_distinct_from_zero() {
        let degraded = SimilarityReport::degraded();
        let genuine = SimilarityReport::measured(SimilaritySignals::zero());
        assert_eq!(degraded.signals, genuine.signals);
        assert_ne!(degraded, genuine);
        assert!(degraded.degraded);
    }
}
