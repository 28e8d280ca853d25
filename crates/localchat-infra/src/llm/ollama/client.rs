//! OllamaProvider -- concrete [`LlmProvider`] implementation for Ollama.
//!
//! Sends requests to Ollama's native chat API (`/api/chat`) and streams the
//! newline-delimited JSON reply. The endpoint is expected to be normalized
//! to end with `/` so API paths can be appended directly.

use std::pin::Pin;
use std::time::Duration;

use futures_util::Stream;
use tracing::debug;

use localchat_core::llm::provider::LlmProvider;
use localchat_types::config::ChatConfig;
use localchat_types::llm::{CompletionRequest, LlmError, StreamEvent};

use super::streaming::{classify_http_error, create_ollama_stream};
use super::types::{OllamaChatRequest, OllamaMessage, OllamaOptions, OllamaVersion};

/// Ollama LLM provider.
///
/// No whole-request timeout is set: local models can take minutes to load
/// and generate. Only connecting is bounded.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new Ollama provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Server root ending with `/` (e.g., "http://localhost:11434/")
    /// * `model` - Model identifier (e.g., "llama3.2:1b")
    pub fn new(base_url: String, model: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            model,
        })
    }

    /// Create a provider from the startup configuration.
    pub fn from_config(config: &ChatConfig) -> Result<Self, LlmError> {
        Self::new(config.endpoint.clone(), config.model.clone())
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`OllamaChatRequest`].
    fn to_ollama_request(&self, request: &CompletionRequest) -> OllamaChatRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| OllamaMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        OllamaChatRequest {
            model,
            messages,
            stream: request.stream,
            options: request.temperature.map(|t| OllamaOptions {
                temperature: Some(t),
            }),
        }
    }
}

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn version(&self) -> Result<String, LlmError> {
        let response = self
            .client
            .get(self.url("api/version"))
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(&self.model, status.as_u16(), &error_body));
        }

        let version: OllamaVersion = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse version: {e}")))?;
        Ok(version.version)
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let mut body = self.to_ollama_request(&request);
        body.stream = true;
        let url = self.url("api/chat");
        debug!(url = %url, messages = body.messages.len(), "Opening chat stream");

        create_ollama_stream(&self.client, &url, body)
    }
}
