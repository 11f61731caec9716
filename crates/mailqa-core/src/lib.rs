//! mailqa Core - ask one question of every email in a spreadsheet.
//!
//! The pipeline takes a tabular dataset of emails, a row selection and a
//! question, and produces one LLM answer per selected row:
//!
//! ```text
//! File → Ingest (schema check) → Select rows → Answer each row (1 LLM call) → Results
//! ```
//!
//! Rows are answered strictly one after another. A row whose email text is
//! empty is skipped without a provider call.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mailqa_core::{
//!     ingest, select, run_batch, AnswerGenerator, BatchOptions, Config, LlmProviderFactory,
//!     Query, SelectionMode, Verbosity,
//! };
//!
//! #[tokio::main]
//! async fn main() -> mailqa_core::Result<()> {
//!     let config = Config::load()?;
//!     let dataset = ingest::load("emails.csv".as_ref(), &config.ingest)?;
//!     let rows = select(&dataset, &SelectionMode::Range { start: 1, end: 10 })?;
//!
//!     let provider = LlmProviderFactory::create("openai", &config.llm, None, timeout)?;
//!     let generator = AnswerGenerator::new(provider, config.generation.clone());
//!     let query = Query::new("What is being asked?", Verbosity::Short);
//!
//!     let report = run_batch(&generator, &rows, &query, &BatchOptions::default(), |_| {}).await?;
//!     for result in &report.results {
//!         println!("{}: {}", result.row, result.answer);
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod answer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod output;
pub mod selection;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use answer::{
    run_batch, Answer, AnswerGenerator, AnswerResult, BatchOptions, BatchReport, ErrorPolicy,
    Query, RowFailure, RowOutcome, Verbosity,
};
pub use config::Config;
pub use dataset::{Dataset, Row};
pub use error::{
    ConfigError, IngestError, MailQaError, ProviderError, Result, SelectionError,
};
pub use llm::{LlmProvider, LlmProviderFactory};
pub use output::{OutputFormat, OutputWriter};
pub use selection::{select, SelectionMode};
pub use session::{Session, Step};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
