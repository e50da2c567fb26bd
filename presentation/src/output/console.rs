//! Console output formatter for match reports

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use matchmaker_application::{BatchItem, BatchSummary};
use matchmaker_domain::{Decision, DecisionKind, MatchReport, OutputFormat, RunStatus, Speaker};
use serde_json::json;

/// Formats match reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format_full(report: &MatchReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Match Report"));
        output.push('\n');
        output.push_str(&format!(
            "{} {} vs {}\n",
            "Pair:".cyan().bold(),
            report.persona_1,
            report.persona_2
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status(&report.status)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Ended by:".cyan().bold(),
            report.termination
        ));

        output.push_str(&Self::section_header("Conversation"));
        for (i, turn) in report.conversation.iter().enumerate() {
            let who = match turn.speaker {
                Speaker::A => format!("{} ({})", turn.speaker, report.persona_1).yellow().bold(),
                Speaker::B => format!("{} ({})", turn.speaker, report.persona_2).blue().bold(),
            };
            output.push_str(&format!(
                "\n{} {} {}\n{}\n",
                format!("#{}", i + 1).dimmed(),
                who,
                format!("[{}]", turn.phase.display_name()).dimmed(),
                Self::indent(&turn.message, "  ")
            ));
        }

        let m = &report.final_metrics;
        output.push_str(&Self::section_header("Metrics"));
        output.push_str(&format!(
            "  turns: {} ({} / {})\n",
            m.total_turns, m.profile_1_turns, m.profile_2_turns
        ));
        output.push_str(&format!(
            "  avg length: {:.1}  last length: {}\n",
            m.average_message_length, m.last_message_length
        ));
        output.push_str(&format!(
            "  commitment: {}  disinterest: {}  validation requests: {}\n",
            m.commitment_hits, m.disinterest_hits, m.validation_request_hits
        ));

        let s = &report.similarity_signals;
        output.push_str(&Self::section_header("Similarity"));
        output.push_str(&format!(
            "  needs_1 ~ personality_2: {:.3}\n  needs_2 ~ personality_1: {:.3}\n  aggregate: {:.3}{}\n",
            s.needs1_vs_personality2,
            s.needs2_vs_personality1,
            s.aggregate,
            if report.similarity_degraded {
                format!(" {}", "(embeddings unavailable)".red())
            } else {
                String::new()
            }
        ));

        output.push_str(&Self::section_header("Outcome"));
        output.push_str(&format!(
            "  {} {}\n",
            report.outcome.as_str().bold(),
            format!("({})", report.outcome_basis.as_str()).dimmed()
        ));

        output.push_str(&Self::section_header("Decision"));
        output.push_str(&format!(
            "  {} {}\n",
            "Proposed:".dimmed(),
            Self::decision_line(&report.proposed_decision)
        ));
        output.push_str(&format!(
            "  {}    {}\n",
            "Final:".bold(),
            Self::decision_line(&report.chat_decision)
        ));
        output.push_str(&format!(
            "\n{}\n",
            Self::indent(&report.chat_decision.rationale, "  ")
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &MatchReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format outcome and final decision only (concise output)
    pub fn format_summary(report: &MatchReport) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {} {}\n",
            report.persona_1.bold(),
            "vs".dimmed(),
            report.persona_2.bold()
        ));
        output.push_str(&format!(
            "  {} {}\n",
            "Decision:".cyan(),
            Self::decision_line(&report.chat_decision)
        ));
        output.push_str(&format!(
            "  {} {}  {} {:.2}{}\n",
            "Outcome:".cyan(),
            report.outcome.as_str(),
            "Similarity:".cyan(),
            report.similarity_signals.aggregate,
            if report.similarity_degraded {
                " (degraded)"
            } else {
                ""
            }
        ));
        if let RunStatus::Truncated { error } = &report.status {
            output.push_str(&format!("  {} {}\n", "Truncated:".red().bold(), error));
        }
        output.push_str(&format!("  {}\n", report.chat_decision.rationale));
        output
    }

    /// Format every pair of a batch followed by the totals
    pub fn format_batch(items: &[BatchItem], format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            let entries: Vec<_> = items
                .iter()
                .map(|item| match &item.result {
                    Ok(report) => serde_json::to_value(report).unwrap_or_default(),
                    Err(e) => json!({ "pair": item.label, "error": e.to_string() }),
                })
                .collect();
            return serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string());
        }

        let mut output = String::new();
        for item in items {
            match &item.result {
                Ok(report) => match format {
                    OutputFormat::Full => output.push_str(&Self::format_full(report)),
                    _ => output.push_str(&Self::format_summary(report)),
                },
                Err(e) => output.push_str(&format!(
                    "{}\n  {} {}\n",
                    item.label.bold(),
                    "Failed:".red().bold(),
                    e
                )),
            }
            output.push('\n');
        }

        let summary = BatchSummary::from_items(items);
        output.push_str(&format!(
            "{} {} completed, {} truncated, {} failed\n",
            "Batch:".cyan().bold(),
            summary.completed.to_string().green(),
            summary.truncated.to_string().yellow(),
            summary.failed.to_string().red()
        ));
        output
    }

    fn decision_line(decision: &Decision) -> String {
        format!(
            "{} (confidence {:.2})",
            Self::decision_label(decision.decision),
            decision.confidence
        )
    }

    fn decision_label(kind: DecisionKind) -> ColoredString {
        let label = kind.as_str().to_uppercase();
        match kind {
            DecisionKind::Proceed => label.green().bold(),
            DecisionKind::MoreInfo => label.yellow().bold(),
            DecisionKind::NotAFit => label.red().bold(),
        }
    }

    fn status(status: &RunStatus) -> ColoredString {
        match status {
            RunStatus::Completed => "completed".green(),
            RunStatus::Truncated { error } => format!("truncated ({})", error).red(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, report: &MatchReport) -> String {
        Self::format_full(report)
    }

    fn format_summary(&self, report: &MatchReport) -> String {
        Self::format_summary(report)
    }

    fn format_json(&self, report: &MatchReport) -> String {
        Self::format_json(report)
    }

    fn format_batch(&self, items: &[BatchItem], format: OutputFormat) -> String {
        Self::format_batch(items, format)
    }
}
