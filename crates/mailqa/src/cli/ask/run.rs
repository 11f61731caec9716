//! Batch execution with a progress bar and streaming output.

use indicatif::ProgressBar;
use mailqa_core::{
    run_batch, AnswerGenerator, BatchOptions, BatchReport, OutputWriter, Query, Row, RowOutcome,
};
use std::io::{self, Write};

/// Answer `rows` and write the results through `writer`.
///
/// Streaming formats (JSONL, text) are written as each row is answered. The
/// JSON array is written once the batch ends. When the batch aborts, the
/// answers produced before the failure are still written and the failure is
/// returned.
pub async fn answer_rows<W: Write>(
    generator: &AnswerGenerator,
    rows: &[&Row],
    query: &Query,
    options: &BatchOptions,
    writer: &mut OutputWriter<W>,
) -> anyhow::Result<BatchReport> {
    let progress = create_progress_bar(rows.len() as u64);
    let streaming = writer.format().is_streaming();

    let mut collected = Vec::new();
    let mut write_error: Option<io::Error> = None;

    let outcome = run_batch(generator, rows, query, options, |outcome| {
        match outcome {
            RowOutcome::Answered(result) => {
                progress.set_message(format!("answered row {}", result.row));
                if !streaming {
                    collected.push(result.clone());
                } else if write_error.is_none() {
                    if let Err(e) = progress.suspend(|| writer.write(result)) {
                        write_error = Some(e);
                    }
                }
            }
            RowOutcome::Skipped(row) => {
                progress.set_message(format!("skipped row {row} (no text)"));
            }
            RowOutcome::Failed(failure) => {
                progress.set_message(format!("row {} failed", failure.row));
            }
        }
        progress.inc(1);
    })
    .await;

    progress.finish_and_clear();

    if !streaming && (outcome.is_ok() || !collected.is_empty()) {
        writer.write_all(&collected)?;
    }
    writer.flush()?;

    if let Some(e) = write_error {
        return Err(e.into());
    }
    Ok(outcome?)
}

/// Progress bar over the selected rows, drawn on stderr.
pub fn create_progress_bar(total: u64) -> ProgressBar {
    use indicatif::ProgressStyle;

    let pb = ProgressBar::new(total);
    match ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        Ok(style) => pb.set_style(style.progress_chars("##-")),
        Err(e) => tracing::debug!("Falling back to default progress style: {e}"),
    }
    pb.set_message("asking...");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mailqa_core::config::GenerationConfig;
    use mailqa_core::llm::{LlmProvider, LlmRequest, LlmResponse};
    use mailqa_core::{
        select, Dataset, ErrorPolicy, MailQaError, OutputFormat, ProviderError, SelectionMode,
        Verbosity,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Answers "answer N" for call N, failing the calls listed in `fail_on`.
    struct ScriptedProvider {
        calls: AtomicU32,
        fail_on: Vec<u32>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn generate(&self, _request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&idx) {
                return Err(ProviderError::with_status("scripted", 500, "boom"));
            }
            Ok(LlmResponse {
                text: format!("answer {idx}"),
                model: "scripted-1".to_string(),
                tokens_used: Some(4),
                latency_ms: 1,
            })
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(1)
        }
    }

    fn generator(fail_on: &[u32]) -> AnswerGenerator {
        AnswerGenerator::new(
            Box::new(ScriptedProvider {
                calls: AtomicU32::new(0),
                fail_on: fail_on.to_vec(),
            }),
            GenerationConfig::default(),
        )
    }

    fn dataset() -> Dataset {
        Dataset::from_texts([Some("first"), None, Some("third")], "Email Body")
    }

    #[tokio::test]
    async fn text_output_skips_empty_rows() {
        let ds = dataset();
        let rows = select(&ds, &SelectionMode::All).unwrap();
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Text, false);

        let report = answer_rows(
            &generator(&[]),
            &rows,
            &Query::new("q", Verbosity::Short),
            &BatchOptions::default(),
            &mut writer,
        )
        .await
        .unwrap();

        assert_eq!(report.skipped, vec![2]);
        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            output,
            "Email 1:\nfirst\nAnswer:\nanswer 0\n\nEmail 3:\nthird\nAnswer:\nanswer 1\n"
        );
    }

    #[tokio::test]
    async fn json_array_is_written_at_the_end() {
        let ds = dataset();
        let rows = select(&ds, &SelectionMode::Manual { indices: vec![3, 1] }).unwrap();
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json, false);

        answer_rows(
            &generator(&[]),
            &rows,
            &Query::new("q", Verbosity::Medium),
            &BatchOptions::default(),
            &mut writer,
        )
        .await
        .unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["row"], 3);
        assert_eq!(parsed[1]["row"], 1);
        assert_eq!(parsed[1]["model"], "scripted-1");
    }

    #[tokio::test]
    async fn abort_keeps_answers_before_the_failure() {
        let ds = Dataset::from_texts([Some("a"), Some("b"), Some("c")], "Email Body");
        let rows = select(&ds, &SelectionMode::All).unwrap();
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines, false);

        let err = answer_rows(
            &generator(&[1]),
            &rows,
            &Query::new("q", Verbosity::Short),
            &BatchOptions::default(),
            &mut writer,
        )
        .await
        .unwrap_err();

        match err.downcast_ref::<MailQaError>() {
            Some(MailQaError::Batch { row, .. }) => assert_eq!(*row, 2),
            other => panic!("expected batch error, got {other:?}"),
        }
        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"row\":1"));
    }

    #[tokio::test]
    async fn continue_writes_remaining_rows() {
        let ds = Dataset::from_texts([Some("a"), Some("b"), Some("c")], "Email Body");
        let rows = select(&ds, &SelectionMode::All).unwrap();
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines, false);
        let options = BatchOptions {
            on_error: ErrorPolicy::Continue,
        };

        let report = answer_rows(
            &generator(&[1]),
            &rows,
            &Query::new("q", Verbosity::Short),
            &options,
            &mut writer,
        )
        .await
        .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 2);
        assert_eq!(writer.items_written(), 2);
    }
}
