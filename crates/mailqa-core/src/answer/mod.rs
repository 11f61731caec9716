//! Answer generation: one prompt and one provider call per email.
//!
//! The generator is stateless apart from its injected provider and the
//! generation parameters. Identical inputs issued twice make two calls.

mod batch;

pub use batch::{
    run_batch, AnswerResult, BatchOptions, BatchReport, ErrorPolicy, RowFailure, RowOutcome,
};

use crate::config::GenerationConfig;
use crate::error::ProviderError;
use crate::llm::{ChatMessage, LlmProvider, LlmRequest, Role};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How long the answer should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl Verbosity {
    pub const ALL: [Verbosity; 3] = [Verbosity::Short, Verbosity::Medium, Verbosity::Detailed];

    /// Instruction fragment prepended to the question.
    pub fn instruction(&self) -> &'static str {
        match self {
            Verbosity::Short => "Provide a short answer.",
            Verbosity::Medium => "Provide a medium answer.",
            Verbosity::Detailed => "Provide a detailed answer.",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Short => write!(f, "Short"),
            Verbosity::Medium => write!(f, "Medium"),
            Verbosity::Detailed => write!(f, "Detailed"),
        }
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Verbosity::Short),
            "medium" => Ok(Verbosity::Medium),
            "detailed" => Ok(Verbosity::Detailed),
            other => Err(format!(
                "unknown verbosity '{other}' (expected short, medium or detailed)"
            )),
        }
    }
}

/// A question plus the desired answer length, fixed for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub question: String,
    pub verbosity: Verbosity,
}

impl Query {
    pub fn new(question: impl Into<String>, verbosity: Verbosity) -> Self {
        Self {
            question: question.into(),
            verbosity,
        }
    }

    /// The question qualified by the verbosity instruction.
    pub fn qualified_question(&self) -> String {
        format!("{} {}", self.verbosity.instruction(), self.question)
    }
}

/// One generated answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Answer text, verbatim from the provider
    pub text: String,
    /// Total tokens (prompt + completion) reported by the provider
    pub tokens_used: Option<u32>,
    /// Model that produced the answer
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Build the user prompt: verbosity-qualified question, then the email as context.
pub fn build_prompt(text: &str, query: &Query) -> String {
    format!("{}: {}", query.qualified_question(), text)
}

/// Turns (email text, query) into a single completion call.
pub struct AnswerGenerator {
    provider: Box<dyn LlmProvider>,
    params: GenerationConfig,
    instruction_role: Role,
}

impl AnswerGenerator {
    /// Wrap a ready-to-use provider with the given generation parameters.
    ///
    /// An unrecognized `instruction_role` falls back to `assistant`.
    pub fn new(provider: Box<dyn LlmProvider>, params: GenerationConfig) -> Self {
        let instruction_role = Role::parse(&params.instruction_role).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown instruction role '{}', using 'assistant'",
                params.instruction_role
            );
            Role::Assistant
        });
        Self {
            provider,
            params,
            instruction_role,
        }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Per-request timeout of the underlying provider.
    pub fn timeout(&self) -> Duration {
        self.provider.timeout()
    }

    /// Check that the provider is configured and reachable before any row
    /// is sent, so a stopped Ollama or a missing key fails once instead of
    /// on every row.
    pub async fn ensure_available(&self) -> Result<(), ProviderError> {
        if self.provider.is_available().await {
            return Ok(());
        }
        Err(ProviderError::new(
            self.provider.name(),
            "provider is not available; check that it is running and configured",
        ))
    }

    /// The two-message exchange sent for one email.
    pub fn messages(&self, text: &str, query: &Query) -> Vec<ChatMessage> {
        vec![
            ChatMessage::new(self.instruction_role, self.params.instruction.clone()),
            ChatMessage::new(Role::User, build_prompt(text, query)),
        ]
    }

    /// Generate an answer for one email.
    ///
    /// `text` must be non-empty; callers filter missing rows out first.
    pub async fn generate(&self, text: &str, query: &Query) -> Result<Answer, ProviderError> {
        let request = LlmRequest::new(self.messages(text, query), &self.params);
        let response = self.provider.generate(&request).await?;

        Ok(Answer {
            text: response.text,
            tokens_used: response.tokens_used,
            model: response.model,
            latency_ms: response.latency_ms,
        })
    }
}
