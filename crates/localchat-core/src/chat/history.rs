//! Bounded conversation history.
//!
//! The history holds an optional leading system message followed by
//! user/assistant turns. After every append it is trimmed from the oldest
//! end so that at most `max_turns` turns remain; a user message and the
//! assistant reply right after it are always dropped together.

use localchat_types::llm::{Message, MessageRole};
use tracing::debug;

/// Trim `messages` in place so at most `max_turns` user/assistant pairs remain.
///
/// Only index 0 is checked for a system message; if present it is never
/// removed and does not count toward the limit. Malformed shapes (orphan
/// assistant replies, consecutive user messages) are dropped one entry at a
/// time, so the function is total for any input.
///
/// Returns the number of messages removed.
pub fn trim_history(messages: &mut Vec<Message>, max_turns: usize) -> usize {
    let has_system = messages
        .first()
        .is_some_and(|m| m.role == MessageRole::System);
    let floor = usize::from(has_system);
    let keep = max_turns.saturating_mul(2).saturating_add(floor);

    let before = messages.len();
    while messages.len() > keep && messages.len() > floor {
        if messages[floor].role == MessageRole::User {
            messages.remove(floor);
            if messages
                .get(floor)
                .is_some_and(|m| m.role == MessageRole::Assistant)
            {
                messages.remove(floor);
            }
            continue;
        }

        // Orphan assistant or anything else unexpected: drop just this entry.
        messages.remove(floor);
    }

    before - messages.len()
}

/// Ordered, self-trimming list of conversation messages.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: Vec<Message>,
    max_turns: usize,
}

impl ConversationHistory {
    /// Create a history bounded to `max_turns`, seeded with a system
    /// message when `system_prompt` is non-blank.
    pub fn new(max_turns: usize, system_prompt: Option<&str>) -> Self {
        let messages = match system_prompt {
            Some(prompt) if !prompt.trim().is_empty() => vec![Message::system(prompt)],
            _ => Vec::new(),
        };
        Self {
            messages,
            max_turns,
        }
    }

    /// Append a user message and trim.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Append an assistant reply and trim.
    ///
    /// Blank replies are not recorded; returns whether the reply was kept.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> bool {
        let content = content.into();
        if content.trim().is_empty() {
            return false;
        }
        self.push(Message::assistant(content));
        true
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.trim();
    }

    /// Apply the retention rule with the configured turn limit.
    pub fn trim(&mut self) -> usize {
        let removed = trim_history(&mut self.messages, self.max_turns);
        if removed > 0 {
            debug!(removed, remaining = self.messages.len(), "Trimmed conversation history");
        }
        removed
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
