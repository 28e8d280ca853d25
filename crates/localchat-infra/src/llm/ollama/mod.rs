//! Ollama LLM provider implementation.
//!
//! This module provides the [`OllamaProvider`] which implements the
//! [`LlmProvider`](localchat_core::llm::provider::LlmProvider) trait for
//! Ollama's native chat API, including NDJSON streaming support.

pub mod client;
pub mod streaming;
pub mod types;

pub use client::OllamaProvider;
