//! LlmProvider trait definition.
//!
//! This is the core abstraction that model backends implement.
//! Uses RPITIT for `version`, and `Pin<Box<dyn Stream>>` for `stream`
//! (streams need to be object-safe for the BoxLlmProvider wrapper).

use std::pin::Pin;

use futures_util::Stream;

use localchat_types::llm::{CompletionRequest, LlmError, StreamEvent};

/// Trait for LLM provider backends.
///
/// Implementations live in localchat-infra (e.g., `OllamaProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Ask the backend for its version string.
    ///
    /// Doubles as a reachability probe: an error here means the backend is
    /// down or not what we expect.
    fn version(&self) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// The stream is finite and cannot be restarted; a new request is needed
    /// for another attempt.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;
}
