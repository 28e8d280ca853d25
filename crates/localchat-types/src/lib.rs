//! Shared domain types for localchat.
//!
//! Message shapes, completion requests, streaming events, the LLM error
//! taxonomy and the startup configuration. Zero infrastructure
//! dependencies -- only serde and thiserror.

pub mod config;
pub mod llm;
