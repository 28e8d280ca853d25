//! Conversation state and the per-turn driver.
//!
//! `history` owns the bounded message list and its trim rule, `input`
//! decides whether a line ends the session, and `session` runs one
//! user turn against a provider.

pub mod history;
pub mod input;
pub mod session;
