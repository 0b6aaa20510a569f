//! Chat messages and the monotonic timestamp clock

use serde::{Deserialize, Serialize};

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a conversation.
///
/// `timestamp` doubles as the persistence key, so it must be unique within
/// a conversation; [`MonotonicClock`] guarantees that. `transient` marks
/// progress-indicator entries that are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
    #[serde(default)]
    pub transient: bool,
    #[serde(default)]
    pub streaming: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp,
            transient: false,
            streaming: false,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
            transient: false,
            streaming: false,
        }
    }

    /// Empty assistant message shown while a reply streams in.
    pub fn placeholder(timestamp: i64) -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            timestamp,
            transient: false,
            streaming: true,
        }
    }

    /// Ephemeral progress indicator, e.g. "AI is searching the web…".
    pub fn transient(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
            transient: true,
            streaming: true,
        }
    }
}

/// Wall-clock milliseconds, strictly increasing across calls.
///
/// Two messages created within the same millisecond would otherwise share
/// a persistence key.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: i64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from persisted history so new timestamps sort after it.
    pub fn starting_after(last: i64) -> Self {
        Self { last }
    }

    pub fn now(&mut self) -> i64 {
        let wall = chrono::Utc::now().timestamp_millis();
        self.last = wall.max(self.last + 1);
        self.last
    }
}
