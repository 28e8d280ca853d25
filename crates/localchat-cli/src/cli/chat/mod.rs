//! Interactive CLI chat experience for localchat.
//!
//! This module implements the terminal side of a chat: welcome banner,
//! async line input, thinking spinner, streamed reply printing and error
//! guidance. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod input;
pub mod loop_runner;
pub mod renderer;
