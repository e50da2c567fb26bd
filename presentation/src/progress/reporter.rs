//! Progress reporting for match execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use matchmaker_application::ProgressNotifier;
use matchmaker_domain::{
    Decision, DecisionKind, MatchReport, Phase, SimilarityReport, TerminationReason, Turn,
};
use std::sync::Mutex;
use std::time::Duration;

/// Width of the last-message preview next to the spinner
const PREVIEW_CHARS: usize = 60;

fn preview(message: &str) -> String {
    let line = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() <= PREVIEW_CHARS {
        line
    } else {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}

fn decision_mark(kind: DecisionKind) -> String {
    match kind {
        DecisionKind::Proceed => "proceed".green().to_string(),
        DecisionKind::MoreInfo => "more_info".yellow().to_string(),
        DecisionKind::NotAFit => "not_a_fit".red().to_string(),
    }
}

/// Reports progress of a single match with a turn bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn turn_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_match_start(&self, persona_1: &str, persona_2: &str, max_turns: usize) {
        let pb = ProgressBar::new(max_turns as u64);
        pb.set_style(Self::turn_style());
        pb.set_prefix(format!("{} vs {}", persona_1, persona_2));
        pb.set_message(Phase::Opening.display_name().to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_turn(&self, turn: &Turn, turn_index: usize, _max_turns: usize) {
        self.with_bar(|pb| {
            pb.set_position(turn_index as u64 + 1);
            pb.set_message(format!(
                "{} {}: {}",
                turn.phase.display_name().dimmed(),
                turn.speaker,
                preview(&turn.message)
            ));
        });
    }

    fn on_phase_change(&self, _from: Phase, to: Phase) {
        self.with_bar(|pb| pb.println(format!("  {} {}", "->".cyan(), to.display_name().bold())));
    }

    fn on_turn_retry(&self, turn_index: usize, error: &str) {
        self.with_bar(|pb| {
            pb.println(format!(
                "  {} turn {} failed, retrying: {}",
                "!".yellow(),
                turn_index + 1,
                error
            ))
        });
    }

    fn on_conversation_end(&self, reason: &TerminationReason) {
        self.with_bar(|pb| {
            let msg = if reason.is_truncation() {
                format!("{} {}", "x".red(), reason)
            } else {
                format!("{} {}", "v".green(), reason)
            };
            pb.set_message(format!("{} - scoring...", msg));
        });
    }

    fn on_similarity(&self, similarity: &SimilarityReport) {
        if similarity.degraded {
            self.with_bar(|pb| {
                pb.println(format!(
                    "  {} embeddings unavailable, similarity set to 0.0",
                    "!".yellow()
                ))
            });
        }
    }

    fn on_match_complete(&self, report: &MatchReport) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!(
                "{} ({:.2})",
                decision_mark(report.chat_decision.decision),
                report.chat_decision.confidence
            ));
        }
    }
}

/// Reports batch progress: one bar over all pairs.
///
/// Turns from concurrent conversations interleave, so only per-pair
/// completion is shown.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total_pairs: usize) -> Self {
        let bar = ProgressBar::new(total_pairs as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar.set_prefix("Matching");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done".green().to_string());
    }
}

impl ProgressNotifier for BatchProgress {
    fn on_match_start(&self, persona_1: &str, persona_2: &str, _max_turns: usize) {
        self.bar.set_message(format!("{} vs {}", persona_1, persona_2));
    }

    fn on_turn(&self, _turn: &Turn, _turn_index: usize, _max_turns: usize) {}

    fn on_conversation_end(&self, _reason: &TerminationReason) {}

    fn on_match_complete(&self, report: &MatchReport) {
        self.bar.println(format!(
            "  {} vs {}: {}{}",
            report.persona_1,
            report.persona_2,
            decision_mark(report.chat_decision.decision),
            if report.status.is_truncated() {
                " (truncated)".red().to_string()
            } else {
                String::new()
            }
        ));
        self.bar.inc(1);
    }
}

/// Simple text-based progress (no fancy UI), one line per event on stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_match_start(&self, persona_1: &str, persona_2: &str, max_turns: usize) {
        eprintln!(
            "{} {} vs {} (up to {} turns)",
            "->".cyan(),
            persona_1.bold(),
            persona_2.bold(),
            max_turns
        );
    }

    fn on_turn(&self, turn: &Turn, turn_index: usize, max_turns: usize) {
        eprintln!(
            "  [{}/{}] {} {}",
            turn_index + 1,
            max_turns,
            turn.speaker,
            preview(&turn.message)
        );
    }

    fn on_phase_change(&self, _from: Phase, to: Phase) {
        eprintln!("  {} {}", "->".cyan(), to.display_name());
    }

    fn on_turn_retry(&self, turn_index: usize, error: &str) {
        eprintln!("  {} turn {} retry: {}", "!".yellow(), turn_index + 1, error);
    }

    fn on_conversation_end(&self, reason: &TerminationReason) {
        eprintln!("  ended: {}", reason);
    }

    fn on_decision(&self, decision: &Decision) {
        eprintln!(
            "  decision: {} ({:.2})",
            decision_mark(decision.decision),
            decision.confidence
        );
    }

    fn on_match_complete(&self, _report: &MatchReport) {
        eprintln!();
    }
}
