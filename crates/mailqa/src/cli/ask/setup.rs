//! Ask setup: config overrides, dataset loading, provider creation.

use mailqa_core::config::LlmConfig;
use mailqa_core::{
    ingest, AnswerGenerator, BatchOptions, Config, LlmProviderFactory,
    OutputFormat as CoreOutputFormat, Query,
};
use std::time::Duration;

use super::types::LlmProvider;
use super::{AskArgs, AskContext};

/// Validate input, apply CLI overrides to the config, load the dataset and
/// build the generator.
pub fn setup_ask(args: &AskArgs, mut config: Config) -> anyhow::Result<AskContext> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input file does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    if let Some(ref column) = args.text_column {
        config.ingest.text_column = column.clone();
    }
    if args.sheet.is_some() {
        config.ingest.sheet = args.sheet.clone();
    }
    if args.continue_on_error {
        config.batch.continue_on_error = true;
    }

    let dataset = ingest::load(&args.input, &config.ingest)?;
    tracing::info!("Loaded {} row(s) from {:?}", dataset.len(), args.input);

    let provider = resolve_provider(args.llm, &config)?;
    let generator = create_generator(
        provider,
        args.llm_model.as_deref(),
        args.api_key.as_deref(),
        &config,
    )?;

    let format = match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.format).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown output format '{}' in config, using text",
                config.output.format
            );
            CoreOutputFormat::Text
        }),
    };

    Ok(AskContext {
        dataset,
        generator,
        query: Query::new(args.question.clone(), args.verbosity.into()),
        options: BatchOptions::from_config(&config.batch),
        format,
        pretty: config.output.pretty,
    })
}

/// The provider from the command line, or `llm.provider` from config.
pub fn resolve_provider(
    cli: Option<LlmProvider>,
    config: &Config,
) -> anyhow::Result<LlmProvider> {
    match cli {
        Some(provider) => Ok(provider),
        None => LlmProvider::from_config(&config.llm.provider).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown LLM provider '{}' in config. Expected one of: openai, ollama, anthropic, hyperbolic",
                config.llm.provider
            )
        }),
    }
}

/// Create the answer generator for `provider`.
///
/// A session `api_key` takes precedence over the config and environment.
pub fn create_generator(
    provider: LlmProvider,
    model: Option<&str>,
    api_key: Option<&str>,
    config: &Config,
) -> anyhow::Result<AnswerGenerator> {
    let mut llm_config = config.llm.clone();
    if let Some(key) = api_key {
        inject_api_key(&mut llm_config, provider, key);
    }

    let timeout = Duration::from_millis(config.limits.llm_timeout_ms);
    let llm = LlmProviderFactory::create(&provider.to_string(), &llm_config, model, timeout)?;
    tracing::debug!("Using {} provider", llm.name());

    Ok(AnswerGenerator::new(llm, config.generation.clone()))
}

/// Inject a session API key into the LLM config for the given provider.
pub fn inject_api_key(llm_config: &mut LlmConfig, provider: LlmProvider, key: &str) {
    match provider {
        LlmProvider::Openai => {
            llm_config.openai.get_or_insert_with(Default::default).api_key = key.to_string();
        }
        LlmProvider::Anthropic => {
            llm_config.anthropic.get_or_insert_with(Default::default).api_key = key.to_string();
        }
        LlmProvider::Hyperbolic => {
            llm_config.hyperbolic.get_or_insert_with(Default::default).api_key = key.to_string();
        }
        LlmProvider::Ollama => {}
    }
}
