//! LLM integration for per-row answer generation.
//!
//! Provides a provider abstraction over multiple chat-completion backends
//! (OpenAI, Ollama, Anthropic, Hyperbolic). Each call is one blocking
//! request/response; there is no retry layer.

pub(crate) mod anthropic;
pub(crate) mod hyperbolic;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use openai::OpenAiProvider;
pub use provider::{
    resolve_env_var, ChatMessage, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse, Role,
};
