//! Run Batch use case
//!
//! Runs independent persona pairs concurrently. Each conversation stays
//! strictly sequential; only whole matches overlap. Results come back in
//! input order regardless of completion order.

use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::run_match::{RunMatchError, RunMatchInput, RunMatchUseCase};
use futures::stream::{self, StreamExt};
use matchmaker_domain::MatchReport;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Result of one pair within a batch
#[derive(Debug)]
pub struct BatchItem {
    pub index: usize,
    pub label: String,
    pub result: Result<MatchReport, RunMatchError>,
}

/// Summary counts over a finished batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub completed: usize,
    pub truncated: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_items(items: &[BatchItem]) -> Self {
        items.iter().fold(Self::default(), |mut acc, item| {
            match &item.result {
                Ok(report) if report.status.is_truncated() => acc.truncated += 1,
                Ok(_) => acc.completed += 1,
                Err(_) => acc.failed += 1,
            }
            acc
        })
    }
}

/// Use case for running many matches with bounded concurrency
pub struct RunBatchUseCase {
    matcher: Arc<RunMatchUseCase>,
    concurrency: usize,
}

impl RunBatchUseCase {
    pub fn new(matcher: Arc<RunMatchUseCase>) -> Self {
        let concurrency = matcher.config().params.batch_concurrency.max(1);
        Self {
            matcher,
            concurrency,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn execute(&self, pairs: Vec<RunMatchInput>) -> Vec<BatchItem> {
        self.execute_with_progress(pairs, &NoProgress, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_progress(
        &self,
        pairs: Vec<RunMatchInput>,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Vec<BatchItem> {
        info!(
            "Running batch of {} pairs (concurrency {})",
            pairs.len(),
            self.concurrency
        );

        let mut items: Vec<BatchItem> = stream::iter(pairs.into_iter().enumerate())
            .map(|(index, input)| {
                let matcher = Arc::clone(&self.matcher);
                async move {
                    let label = input.label();
                    let result = matcher.execute_with_progress(input, progress, cancel).await;
                    if let Err(e) = &result {
                        warn!("Pair {} ({}) failed: {}", index, label, e);
                    }
                    BatchItem {
                        index,
                        label,
                        result,
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        items.sort_by_key(|item| item.index);

        let summary = BatchSummary::from_items(&items);
        info!(
            "Batch finished: {} completed, {} truncated, {} failed",
            summary.completed, summary.truncated, summary.failed
        );
        items
    }
}
