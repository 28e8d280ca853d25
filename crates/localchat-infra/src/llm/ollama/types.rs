//! Wire types for Ollama's native HTTP API.
//!
//! Only the fields localchat reads or writes are modelled; unknown fields in
//! responses are ignored.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaOptions>,
}

/// A chat message as Ollama sends and receives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Model parameters passed through `options`.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// One line of the NDJSON stream returned by `/api/chat`.
///
/// Intermediate lines carry a message fragment with `done: false`. The last
/// line has `done: true` plus timing and token counts. A line with only an
/// `error` field reports a backend failure, possibly mid-stream.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatChunk {
    #[serde(default)]
    pub message: Option<OllamaMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body returned with non-success HTTP statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaErrorBody {
    pub error: String,
}

/// Body of `GET /api/version`.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaVersion {
    pub version: String,
}
