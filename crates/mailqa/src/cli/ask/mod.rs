//! The `mailqa ask` command: one answer per selected email.

mod run;
mod setup;
pub mod types;

pub use types::{LlmProvider, OutputFormat, Verbosity};

pub(crate) use run::{answer_rows, create_progress_bar};
pub(crate) use setup::{create_generator, resolve_provider};

use clap::Args;
use mailqa_core::{
    select, AnswerGenerator, BatchOptions, Config, Dataset, OutputFormat as CoreOutputFormat,
    OutputWriter, Query, SelectionMode,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use setup::setup_ask;

/// Arguments for the `ask` command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// CSV, TSV or Excel file with one email per row
    #[arg(required = true)]
    pub input: PathBuf,

    /// Question to ask about every selected email
    #[arg(short, long)]
    pub question: String,

    /// Rows to answer: "all", a range "2-5", or a list "1,3,4" (1-based)
    #[arg(short, long, default_value = "all")]
    pub rows: SelectionMode,

    /// Answer length
    #[arg(long, value_enum, default_value = "medium")]
    pub verbosity: Verbosity,

    /// LLM provider (defaults to `llm.provider` from config)
    #[arg(long, value_enum)]
    pub llm: Option<LlmProvider>,

    /// LLM model name (provider-specific)
    #[arg(long)]
    pub llm_model: Option<String>,

    /// Column holding the email text (defaults to `ingest.text_column`)
    #[arg(long)]
    pub text_column: Option<String>,

    /// Worksheet to read from spreadsheet files
    #[arg(long)]
    pub sheet: Option<String>,

    /// Keep going when a row's provider call fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// Output format (defaults to `output.format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// API key for the selected provider (session-only, set by interactive mode).
    #[arg(skip)]
    pub api_key: Option<String>,
}

/// Values match the clap defaults above.
impl Default for AskArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            question: String::new(),
            rows: SelectionMode::All,
            verbosity: Verbosity::Medium,
            llm: None,
            llm_model: None,
            text_column: None,
            sheet: None,
            continue_on_error: false,
            format: None,
            output: None,
            api_key: None,
        }
    }
}

/// Everything `execute` needs, assembled by `setup_ask()`.
pub(crate) struct AskContext {
    pub dataset: Dataset,
    pub generator: AnswerGenerator,
    pub query: Query,
    pub options: BatchOptions,
    pub format: CoreOutputFormat,
    pub pretty: bool,
}

/// Execute the ask command.
pub async fn execute(args: AskArgs, config: Config) -> anyhow::Result<()> {
    let ctx = setup_ask(&args, config)?;
    let rows = select(&ctx.dataset, &args.rows)?;
    ctx.generator.ensure_available().await?;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    let mut writer = OutputWriter::new(sink, ctx.format, ctx.pretty);

    let report = answer_rows(&ctx.generator, &rows, &ctx.query, &ctx.options, &mut writer).await?;

    if let Some(path) = &args.output {
        tracing::info!(
            "{} answer(s) written to {:?}",
            writer.items_written(),
            path
        );
    }
    if !report.skipped.is_empty() {
        tracing::info!("Rows without email text: {:?}", report.skipped);
    }
    if !report.failures.is_empty() {
        let failed: Vec<usize> = report.failures.iter().map(|f| f.row).collect();
        tracing::warn!("Rows that failed: {failed:?}");
    }

    Ok(())
}
