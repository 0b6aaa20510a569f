//! The ordered message list behind the chat view

use crate::message::{ChatMessage, MonotonicClock, Role};
use crate::reducer::TurnEvent;

/// Linear conversation transcript. Mutated only from turn events while a
/// reply streams; timestamps come from a strictly monotonic clock so the
/// persistence key is always unique.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    clock: MonotonicClock,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from persisted history.
    pub fn from_history(messages: Vec<ChatMessage>) -> Self {
        let last = messages.iter().map(|m| m.timestamp).max().unwrap_or(0);
        Self {
            messages,
            clock: MonotonicClock::starting_after(last),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether an assistant turn is currently streaming.
    pub fn is_streaming(&self) -> bool {
        self.messages.iter().any(|m| m.streaming && !m.transient)
    }

    /// Append a user message; returns a clone for persistence.
    pub fn push_user(&mut self, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::user(content, self.clock.now());
        self.messages.push(message.clone());
        message
    }

    /// Append a completed assistant message; returns a clone for persistence.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::assistant(content, self.clock.now());
        self.messages.push(message.clone());
        message
    }

    /// History to send with a request: committed turns only, without
    /// transient progress entries or the in-progress reply.
    pub fn history_for_request(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .filter(|m| !m.transient && !m.streaming)
            .cloned()
            .collect()
    }

    /// The most recent completed assistant message, if any.
    pub fn last_completed_assistant(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && !m.transient && !m.streaming)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Fold one turn event into the message list.
    pub fn apply(&mut self, event: &TurnEvent) {
        match event {
            TurnEvent::Started => {
                let timestamp = self.clock.now();
                self.messages.push(ChatMessage::placeholder(timestamp));
            }
            TurnEvent::ContentUpdate { content } => {
                if let Some(message) = self.streaming_message_mut() {
                    message.content = content.clone();
                }
            }
            TurnEvent::TransientShow { text } => {
                self.remove_transients();
                let timestamp = self.clock.now();
                self.messages.push(ChatMessage::transient(text, timestamp));
            }
            TurnEvent::TransientClear => {
                self.remove_transients();
            }
            TurnEvent::Finalized { content } | TurnEvent::Failed { content } => {
                self.remove_transients();
                if let Some(message) = self.streaming_message_mut() {
                    message.content = content.clone();
                    message.streaming = false;
                } else {
                    // no placeholder was ever created; keep the turn visible
                    let timestamp = self.clock.now();
                    self.messages.push(ChatMessage::assistant(content, timestamp));
                }
            }
            TurnEvent::TypingEnded | TurnEvent::ActionRequested(_) => {}
        }
    }

    fn streaming_message_mut(&mut self) -> Option<&mut ChatMessage> {
        self.messages
            .iter_mut()
            .rev()
            .find(|m| m.streaming && !m.transient)
    }

    fn remove_transients(&mut self) {
        self.messages.retain(|m| !m.transient);
    }
}
