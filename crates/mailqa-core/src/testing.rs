//! Test doubles shared by the generator, batch and session tests.

use crate::error::ProviderError;
use crate::llm::{LlmProvider, LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A configurable mock LLM provider.
///
/// Each call to `generate()` invokes the response factory with the current
/// call index, and the request is recorded for post-hoc assertions.
pub(crate) struct MockProvider {
    response_fn: Box<dyn Fn(u32) -> Result<LlmResponse, ProviderError> + Send + Sync>,
    call_count: Arc<AtomicU32>,
    available: bool,
    requests: Arc<Mutex<Vec<LlmRequest>>>,
}

impl MockProvider {
    /// Always answer `text` with a fixed token count.
    pub(crate) fn success(text: &str, tokens: u32) -> Self {
        let text = text.to_string();
        Self::from_fn(move |_| Ok(response(&text, tokens)))
    }

    /// Fail on the given call indices (0-based), succeed otherwise.
    pub(crate) fn failing_on(calls: &[u32], text: &str) -> Self {
        let calls = calls.to_vec();
        let text = text.to_string();
        Self::from_fn(move |idx| {
            if calls.contains(&idx) {
                Err(ProviderError::with_status("mock", 503, "service unavailable"))
            } else {
                Ok(response(&format!("{text} #{idx}"), 10))
            }
        })
    }

    pub(crate) fn from_fn(
        f: impl Fn(u32) -> Result<LlmResponse, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            response_fn: Box::new(f),
            call_count: Arc::new(AtomicU32::new(0)),
            available: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report the provider as unreachable from `is_available()`.
    pub(crate) fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Shared handle to the call counter (clone before moving the provider).
    pub(crate) fn call_count_handle(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    /// Shared handle to the recorded requests.
    pub(crate) fn requests_handle(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
        self.requests.clone()
    }
}

fn response(text: &str, tokens: u32) -> LlmResponse {
    LlmResponse {
        text: text.to_string(),
        model: "mock-v1".to_string(),
        tokens_used: Some(tokens),
        latency_ms: 1,
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, ProviderError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        (self.response_fn)(idx)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
