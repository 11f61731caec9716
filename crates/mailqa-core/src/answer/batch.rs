//! Sequential batch runner over a selection of rows.
//!
//! Rows are answered one at a time, in selection order, each call awaited
//! before the next begins. Total latency is the sum of the per-row
//! round-trips. Outcomes are reported through a callback as they happen so
//! shells can stream results.

use super::{AnswerGenerator, Query};
use crate::config::BatchConfig;
use crate::dataset::Row;
use crate::error::{MailQaError, Result, SelectionError};
use serde::Serialize;

/// What to do when a row's provider call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failure and return it
    #[default]
    Abort,
    /// Record the failure and move on to the next row
    Continue,
}

/// Configuration for a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub on_error: ErrorPolicy,
}

impl BatchOptions {
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            on_error: if config.continue_on_error {
                ErrorPolicy::Continue
            } else {
                ErrorPolicy::Abort
            },
        }
    }
}

/// A row's original email paired with its generated answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
    /// 1-based row number in the dataset
    pub row: usize,
    /// Original email text
    pub email: String,
    /// Generated answer, verbatim
    pub answer: String,
    /// Total tokens reported for this call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    /// Model that produced the answer
    pub model: String,
}

/// A row whose provider call failed under `ErrorPolicy::Continue`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Per-row outcome delivered to the batch callback.
#[derive(Debug)]
pub enum RowOutcome<'a> {
    Answered(&'a AnswerResult),
    /// Row number whose text was missing
    Skipped(usize),
    Failed(&'a RowFailure),
}

/// Everything a finished batch produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub results: Vec<AnswerResult>,
    /// Rows skipped because their text was missing
    pub skipped: Vec<usize>,
    /// Rows that failed (only under `ErrorPolicy::Continue`)
    pub failures: Vec<RowFailure>,
    /// Sum of reported token usage
    pub tokens_used: u64,
}

/// Answer `query` for every selected row, sequentially.
///
/// Rows with missing text are skipped without a provider call. An empty
/// selection is `SelectionError::NoSelection`. Under `ErrorPolicy::Abort`
/// the first provider failure is returned as `MailQaError::Batch` and no
/// further rows are processed.
pub async fn run_batch<F>(
    generator: &AnswerGenerator,
    rows: &[&Row],
    query: &Query,
    options: &BatchOptions,
    mut on_outcome: F,
) -> Result<BatchReport>
where
    F: FnMut(RowOutcome<'_>),
{
    if rows.is_empty() {
        return Err(SelectionError::NoSelection.into());
    }

    tracing::info!(
        "Answering {} row(s) with {} ({} answers, {}s timeout per row)",
        rows.len(),
        generator.provider_name(),
        query.verbosity,
        generator.timeout().as_secs()
    );

    let mut report = BatchReport::default();

    for row in rows {
        let Some(text) = row.text() else {
            tracing::debug!(row = row.number, "Skipping row with empty text");
            report.skipped.push(row.number);
            on_outcome(RowOutcome::Skipped(row.number));
            continue;
        };

        match generator.generate(text, query).await {
            Ok(answer) => {
                tracing::debug!(
                    row = row.number,
                    latency_ms = answer.latency_ms,
                    tokens = ?answer.tokens_used,
                    "Row answered"
                );
                report.tokens_used += u64::from(answer.tokens_used.unwrap_or(0));
                let result = AnswerResult {
                    row: row.number,
                    email: text.to_string(),
                    answer: answer.text,
                    tokens_used: answer.tokens_used,
                    model: answer.model,
                };
                on_outcome(RowOutcome::Answered(&result));
                report.results.push(result);
            }
            Err(e) => match options.on_error {
                ErrorPolicy::Abort => {
                    tracing::error!(row = row.number, "Provider call failed, aborting batch: {e}");
                    return Err(MailQaError::Batch {
                        row: row.number,
                        source: e,
                    });
                }
                ErrorPolicy::Continue => {
                    tracing::warn!(row = row.number, "Provider call failed, continuing: {e}");
                    let failure = RowFailure {
                        row: row.number,
                        error: e.to_string(),
                        status_code: e.status_code,
                    };
                    on_outcome(RowOutcome::Failed(&failure));
                    report.failures.push(failure);
                }
            },
        }
    }

    log_batch_stats(&report);
    Ok(report)
}

fn log_batch_stats(report: &BatchReport) {
    if report.failures.is_empty() {
        tracing::info!(
            "Batch finished: {} answered, {} skipped, {} tokens",
            report.results.len(),
            report.skipped.len(),
            report.tokens_used
        );
    } else {
        tracing::warn!(
            "Batch finished: {} answered, {} skipped, {} failed, {} tokens",
            report.results.len(),
            report.skipped.len(),
            report.failures.len(),
            report.tokens_used
        );
    }
}
