//! LLM provider choice: provider, API key (session only) and model.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use mailqa_core::config::LlmConfig;
use mailqa_core::llm::resolve_env_var;
use mailqa_core::{AnswerGenerator, Config};

use crate::cli::ask::{create_generator, resolve_provider, LlmProvider};

use super::theme::{print_error, print_note};

/// Guide the user through picking a provider and build a generator for it.
///
/// Returns `None` if the user backs out or the provider can't be created.
pub fn choose_generator(
    config: &Config,
    theme: &ColorfulTheme,
) -> anyhow::Result<Option<AnswerGenerator>> {
    let configured = resolve_provider(None, config).unwrap_or(LlmProvider::Openai);
    let labels: Vec<&str> = LlmProvider::ALL.iter().map(|p| p.label()).collect();
    let default = LlmProvider::ALL
        .iter()
        .position(|p| *p == configured)
        .unwrap_or(0);

    let Some(choice) = Select::with_theme(theme)
        .with_prompt("LLM provider")
        .items(&labels)
        .default(default)
        .interact_opt()?
    else {
        return Ok(None);
    };
    let provider = LlmProvider::ALL[choice];

    let mut session_key = None;
    if let Some(env_var) = provider.env_var() {
        if has_key(&config.llm, provider) {
            print_note(format!("Using API key from {env_var} / config"));
        } else {
            let key = super::handle_interrupt(
                Password::with_theme(theme)
                    .with_prompt(format!(
                        "{} API key ({env_var} is not set, used for this session only)",
                        provider.label()
                    ))
                    .allow_empty_password(true)
                    .interact(),
            )?;
            match key {
                Some(key) if !key.is_empty() => session_key = Some(key),
                _ => return Ok(None),
            }
        }
    }

    let Some(model) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt("Model")
            .default(configured_model(&config.llm, provider))
            .interact_text(),
    )?
    else {
        return Ok(None);
    };
    let model = model.trim();

    match create_generator(
        provider,
        (!model.is_empty()).then_some(model),
        session_key.as_deref(),
        config,
    ) {
        Ok(generator) => Ok(Some(generator)),
        Err(e) => {
            print_error(e);
            Ok(None)
        }
    }
}

/// Whether config or environment already supplies a key for `provider`.
fn has_key(llm: &LlmConfig, provider: LlmProvider) -> bool {
    let configured = match provider {
        LlmProvider::Openai => llm.openai.clone().unwrap_or_default().api_key,
        LlmProvider::Anthropic => llm.anthropic.clone().unwrap_or_default().api_key,
        LlmProvider::Hyperbolic => llm.hyperbolic.clone().unwrap_or_default().api_key,
        LlmProvider::Ollama => return true,
    };
    resolve_env_var(&configured).is_some()
}

/// The model the factory would use without an override.
fn configured_model(llm: &LlmConfig, provider: LlmProvider) -> String {
    match provider {
        LlmProvider::Openai => llm.openai.clone().unwrap_or_default().model,
        LlmProvider::Anthropic => llm.anthropic.clone().unwrap_or_default().model,
        LlmProvider::Hyperbolic => llm.hyperbolic.clone().unwrap_or_default().model,
        LlmProvider::Ollama => llm.ollama.clone().unwrap_or_default().model,
    }
}
