//! Business logic and provider trait definitions for localchat.
//!
//! This crate defines the `LlmProvider` port that the infrastructure layer
//! implements, plus the conversation history and session logic that drives
//! one chat. It depends only on `localchat-types` -- never on
//! `localchat-infra` or any HTTP crate.

pub mod chat;
pub mod llm;

#[cfg(test)]
pub(crate) mod testing;
