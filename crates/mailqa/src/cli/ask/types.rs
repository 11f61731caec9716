//! CLI enum types for the ask command: output format, verbosity, LLM provider.

use clap::ValueEnum;
use mailqa_core::{OutputFormat as CoreOutputFormat, Verbosity as CoreVerbosity};

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
    /// `Email N:` / `Answer:` blocks
    Text,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
            OutputFormat::Text => CoreOutputFormat::Text,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Answer length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum Verbosity {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl From<Verbosity> for CoreVerbosity {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Short => CoreVerbosity::Short,
            Verbosity::Medium => CoreVerbosity::Medium,
            Verbosity::Detailed => CoreVerbosity::Detailed,
        }
    }
}

/// Supported LLM providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LlmProvider {
    /// OpenAI API
    Openai,
    /// Local Ollama instance
    Ollama,
    /// Anthropic API
    Anthropic,
    /// Hyperbolic API
    Hyperbolic,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 4] = [
        LlmProvider::Openai,
        LlmProvider::Anthropic,
        LlmProvider::Ollama,
        LlmProvider::Hyperbolic,
    ];

    /// Parse the `llm.provider` config value.
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            LlmProvider::Openai => "OpenAI",
            LlmProvider::Ollama => "Ollama (local)",
            LlmProvider::Anthropic => "Anthropic",
            LlmProvider::Hyperbolic => "Hyperbolic",
        }
    }

    /// Environment variable the default config reads the API key from.
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Openai => Some("OPENAI_API_KEY"),
            LlmProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
            LlmProvider::Hyperbolic => Some("HYPERBOLIC_API_KEY"),
            LlmProvider::Ollama => None,
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Openai => write!(f, "openai"),
            LlmProvider::Ollama => write!(f, "ollama"),
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::Hyperbolic => write!(f, "hyperbolic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_display_matches_factory_names() {
        for provider in LlmProvider::ALL {
            assert_eq!(LlmProvider::from_config(&provider.to_string()), Some(provider));
        }
        assert_eq!(LlmProvider::from_config("OpenAI"), Some(LlmProvider::Openai));
        assert_eq!(LlmProvider::from_config("mistral"), None);
    }

    #[test]
    fn output_format_maps_to_core() {
        assert_eq!(
            CoreOutputFormat::from(OutputFormat::Jsonl),
            CoreOutputFormat::JsonLines
        );
        assert_eq!(OutputFormat::Text.to_string(), "text");
    }

    #[test]
    fn verbosity_maps_to_core() {
        assert_eq!(CoreVerbosity::from(Verbosity::default()), CoreVerbosity::Medium);
        assert_eq!(CoreVerbosity::from(Verbosity::Short), CoreVerbosity::Short);
    }
}
