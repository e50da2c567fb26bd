//! Persists match reports as pretty-printed JSON, one file per pair.

use matchmaker_domain::MatchReport;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReportWriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes `<id1>__vs__<id2>.json` files into one results directory
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `report`, replacing any earlier result for the same pair.
    ///
    /// The file is written under a temporary name first and renamed into
    /// place, so readers never see a partial report.
    pub fn save(&self, report: &MatchReport) -> Result<PathBuf, ReportWriteError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ReportWriteError::Io { path, source }
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let json = serde_json::to_string_pretty(report)?;
        let path = self.dir.join(report.file_name());
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(io_err(&path))?;

        info!("Saved report {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use matchmaker_domain::{
        ClassificationBasis, Decision, DecisionKind, Metrics, Outcome, RunStatus,
        SimilaritySignals, TerminationReason,
    };

    fn report(persona_2: &str, decision: DecisionKind) -> MatchReport {
        MatchReport {
            persona_1: "alice".into(),
            persona_2: persona_2.into(),
            status: RunStatus::Completed,
            termination: TerminationReason::MaxTurns,
            outcome: Outcome::InterestedNextSteps,
            outcome_basis: ClassificationBasis::NoSignal,
            final_metrics: Metrics::default(),
            conversation: vec![],
            similarity_signals: SimilaritySignals::default(),
            similarity_degraded: false,
            proposed_decision: Decision::new(decision, "proposed", 0.8),
            chat_decision: Decision::new(decision, "final", 0.6),
            lexicon_version: "test".into(),
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("results"));

        let path = writer.save(&report("bob/smith", DecisionKind::Proceed)).unwrap();
        assert_eq!(path.file_name().unwrap(), "alice__vs__bob_smith.json");

        let saved: MatchReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.chat_decision.decision, DecisionKind::Proceed);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_replaces_previous_result() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path());

        writer.save(&report("bob", DecisionKind::Proceed)).unwrap();
        let path = writer.save(&report("bob", DecisionKind::NotAFit)).unwrap();

        let saved: MatchReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.chat_decision.decision, DecisionKind::NotAFit);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
