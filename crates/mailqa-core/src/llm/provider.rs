//! LLM provider trait and request/response types.
//!
//! Defines the interface that all chat-completion providers implement, plus
//! the factory that creates the right provider from CLI flags and config.

use crate::config::{GenerationConfig, LlmConfig};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Role tag of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
}

impl Role {
    /// Parse a role tag (as written in config).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "system" => Some(Self::System),
            "assistant" => Some(Self::Assistant),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

/// One role-tagged message of a chat exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Ordered messages; the last one is the user turn to answer
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Frequency penalty (ignored by providers that don't support it)
    pub frequency_penalty: f32,
}

impl LlmRequest {
    /// Build a request from messages using the configured generation parameters.
    pub fn new(messages: Vec<ChatMessage>, params: &GenerationConfig) -> Self {
        Self {
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            frequency_penalty: params.frequency_penalty,
        }
    }
}

/// The response from a completion call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, exactly as returned by the provider
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (prompt + completion), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Check whether the provider is configured and reachable.
    async fn is_available(&self) -> bool;

    /// Issue one completion request.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider based on provider name, config, and optional model override.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("openai", "ollama", "anthropic", "hyperbolic")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    /// * `timeout` - Network timeout applied to each request
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, ProviderError> {
        match provider {
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ProviderError::new(
                        "openai",
                        "OpenAI API key not set. Set OPENAI_API_KEY env var.",
                    )
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(
                    super::openai::OpenAiProvider::with_endpoint(&api_key, &model, &cfg.endpoint)
                        .with_timeout(timeout),
                ))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(
                    super::ollama::OllamaProvider::new(&cfg.endpoint, &model).with_timeout(timeout),
                ))
            }
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ProviderError::new(
                        "anthropic",
                        "Anthropic API key not set. Set ANTHROPIC_API_KEY env var.",
                    )
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(
                    super::anthropic::AnthropicProvider::new(&api_key, &model)
                        .with_timeout(timeout),
                ))
            }
            "hyperbolic" => {
                let cfg = config.hyperbolic.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ProviderError::new(
                        "hyperbolic",
                        "Hyperbolic API key not set. Set HYPERBOLIC_API_KEY env var.",
                    )
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::hyperbolic::HyperbolicProvider::new(
                    &cfg.endpoint,
                    &api_key,
                    &model,
                    timeout,
                )))
            }
            other => Err(ProviderError::new(
                other,
                format!("Unknown LLM provider: {other}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OllamaConfig, OpenAiConfig};

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
        assert_eq!(Role::parse("SYSTEM"), Some(Role::System));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("tool"), None);
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let msg = ChatMessage::new(Role::Assistant, "hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_request_uses_generation_params() {
        let params = GenerationConfig::default();
        let req = LlmRequest::new(vec![ChatMessage::new(Role::User, "q")], &params);
        assert_eq!(req.max_tokens, 200);
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.frequency_penalty, 0.0);
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_factory_creates_openai_with_literal_key() {
        let config = LlmConfig {
            openai: Some(OpenAiConfig {
                api_key: "sk-literal".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let provider =
            LlmProviderFactory::create("openai", &config, None, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_factory_missing_key_is_error() {
        let config = LlmConfig {
            anthropic: Some(crate::config::AnthropicConfig {
                api_key: "${DEFINITELY_NOT_SET_XYZ_456}".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = LlmProviderFactory::create("anthropic", &config, None, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(err.message.contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_factory_ollama_needs_no_key() {
        let config = LlmConfig {
            ollama: Some(OllamaConfig::default()),
            ..Default::default()
        };
        let provider =
            LlmProviderFactory::create("ollama", &config, Some("mistral"), Duration::from_secs(5))
                .unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_factory_unknown_provider() {
        let err = LlmProviderFactory::create(
            "carrier-pigeon",
            &LlmConfig::default(),
            None,
            Duration::from_secs(5),
        )
        .err()
        .unwrap();
        assert!(err.message.contains("Unknown LLM provider"));
    }
}
