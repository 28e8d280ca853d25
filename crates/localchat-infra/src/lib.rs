//! Infrastructure implementations for localchat.
//!
//! Concrete [`LlmProvider`](localchat_core::llm::provider::LlmProvider)
//! backends live here; today that is the Ollama HTTP API.

pub mod llm;
