//! Output formatter trait

use matchmaker_application::BatchItem;
use matchmaker_domain::{MatchReport, OutputFormat};

/// Trait for formatting match reports
pub trait OutputFormatter {
    /// Transcript, metrics, similarity, outcome and both decisions
    fn format_full(&self, report: &MatchReport) -> String;

    /// Outcome and final decision only
    fn format_summary(&self, report: &MatchReport) -> String;

    /// The report as JSON
    fn format_json(&self, report: &MatchReport) -> String;

    /// Every pair of a batch followed by the totals
    fn format_batch(&self, items: &[BatchItem], format: OutputFormat) -> String;

    fn format(&self, report: &MatchReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_full(report),
            OutputFormat::Summary => self.format_summary(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
