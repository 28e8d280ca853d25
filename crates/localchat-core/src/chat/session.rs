//! One chat session: bounded history plus the per-turn completion driver.
//!
//! `ChatSession::send` runs a single user turn: record the question, stream
//! the reply through the provider, and record the answer only if the whole
//! stream succeeded. `ChatSession::handle_line` layers input classification
//! and error policy on top so the interactive loop is a thin shell.

use std::time::{Duration, Instant};

use futures_util::StreamExt;
use tracing::{Instrument, debug, info, info_span, warn};

use localchat_types::config::ChatConfig;
use localchat_types::llm::{CompletionRequest, LlmError, StopReason, StreamEvent, Usage};

use crate::llm::box_provider::BoxLlmProvider;

use super::history::ConversationHistory;
use super::input::{InputAction, classify_input};

/// Result of a successfully streamed turn.
#[derive(Debug, Clone)]
pub struct TurnSummary {
    /// Full reply text, concatenated from every fragment.
    pub text: String,
    /// Token usage reported by the backend (zero if not reported).
    pub usage: Usage,
    pub stop_reason: Option<StopReason>,
    pub elapsed: Duration,
}

/// Whether the interactive loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Receives progress from [`ChatSession::handle_line`].
///
/// The terminal front end implements this to print fragments as they
/// arrive and to render errors; tests implement it to record calls.
pub trait TurnObserver {
    /// A request is about to be sent for a non-quit line.
    fn on_start(&mut self) {}

    /// A non-empty fragment of the reply arrived.
    fn on_delta(&mut self, text: &str);

    /// The reply finished streaming.
    fn on_complete(&mut self, _summary: &TurnSummary) {}

    /// The turn failed. The session exits afterwards only for
    /// [`LlmError::ModelNotFound`].
    fn on_error(&mut self, _error: &LlmError) {}
}

/// State of a single interactive chat.
pub struct ChatSession {
    model: String,
    temperature: Option<f64>,
    history: ConversationHistory,
    turn_count: u32,
    total_usage: Usage,
}

impl ChatSession {
    /// Start a session from the startup configuration.
    ///
    /// The history is seeded with the system prompt if one is configured.
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            history: ConversationHistory::new(config.max_turns, config.system_prompt.as_deref()),
            turn_count: 0,
            total_usage: Usage::default(),
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Number of turns that completed with a recorded reply.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Token usage summed over all completed turns.
    pub fn total_usage(&self) -> Usage {
        self.total_usage
    }

    /// Build a streaming request from the current history.
    pub fn build_request(&self) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: self.history.messages().to_vec(),
            temperature: self.temperature,
            stream: true,
        }
    }

    /// Run one user turn.
    ///
    /// The user message is appended (and history trimmed) before the request
    /// is sent. `on_delta` is called with each non-empty fragment as it
    /// arrives. On success the concatenated reply is appended if it is not
    /// blank. On failure the error is returned and nothing else is appended:
    /// the user message stays and any partial reply is discarded.
    pub async fn send<F>(
        &mut self,
        provider: &BoxLlmProvider,
        text: impl Into<String>,
        mut on_delta: F,
    ) -> Result<TurnSummary, LlmError>
    where
        F: FnMut(&str),
    {
        self.history.push_user(text);
        let request = self.build_request();

        let span = info_span!(
            "gen_ai.stream",
            gen_ai.system = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
            history_len = request.messages.len(),
        );

        let start = Instant::now();
        let mut stream = provider.stream(request);
        let mut reply = String::new();
        let mut usage = Usage::default();
        let mut stop_reason = None;

        let outcome = async {
            while let Some(event) = stream.next().await {
                match event? {
                    StreamEvent::TextDelta { text } => {
                        if !text.is_empty() {
                            on_delta(&text);
                            reply.push_str(&text);
                        }
                    }
                    StreamEvent::Usage(u) => usage = u,
                    StreamEvent::MessageDelta { stop_reason: sr } => stop_reason = Some(sr),
                    StreamEvent::Done => break,
                    StreamEvent::Connected => {}
                }
            }
            Ok::<(), LlmError>(())
        }
        .instrument(span)
        .await;

        if let Err(e) = outcome {
            warn!(error = %e, discarded_chars = reply.len(), "Turn failed");
            return Err(e);
        }

        let elapsed = start.elapsed();
        if let Some(reason) = &stop_reason {
            debug!(stop_reason = %reason, "Model stopped");
        }
        if self.history.push_assistant(reply.clone()) {
            self.turn_count += 1;
        }
        self.total_usage.input_tokens += usage.input_tokens;
        self.total_usage.output_tokens += usage.output_tokens;

        info!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            elapsed_ms = elapsed.as_millis() as u64,
            history_len = self.history.len(),
            "Turn complete"
        );

        Ok(TurnSummary {
            text: reply,
            usage,
            stop_reason,
            elapsed,
        })
    }

    /// Handle one raw input line and decide whether the loop continues.
    ///
    /// - blank input or `exit` ends the session without touching history
    /// - a missing model ends the session after reporting the error
    /// - any other failure is reported and the session carries on
    pub async fn handle_line<O>(
        &mut self,
        provider: &BoxLlmProvider,
        line: &str,
        observer: &mut O,
    ) -> LoopControl
    where
        O: TurnObserver,
    {
        let text = match classify_input(line) {
            InputAction::Quit => return LoopControl::Exit,
            InputAction::Send(text) => text,
        };

        observer.on_start();
        match self.send(provider, text, |delta| observer.on_delta(delta)).await {
            Ok(summary) => {
                observer.on_complete(&summary);
                LoopControl::Continue
            }
            Err(e) => {
                observer.on_error(&e);
                if e.is_model_not_found() {
                    LoopControl::Exit
                } else {
                    LoopControl::Continue
                }
            }
        }
    }
}
