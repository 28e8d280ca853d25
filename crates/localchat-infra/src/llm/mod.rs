//! LLM provider implementations.

pub mod ollama;
