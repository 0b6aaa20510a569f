//! Local conversation persistence
//!
//! One JSONL file per conversation, keyed by message timestamp. The
//! timestamp is the primary key: saving a duplicate is an error, never a
//! silent overwrite. Transient progress messages are never written.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::message::ChatMessage;

/// Entry types in the conversation file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StoreEntry {
    /// Conversation metadata
    Metadata { id: String, created_at: i64 },
    /// A persisted message
    Message { message: ChatMessage },
}

/// Append-only store for one conversation's message history.
pub struct ConversationStore {
    id: String,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    /// Timestamps already on disk; the dedupe key.
    seen: BTreeSet<i64>,
}

impl ConversationStore {
    /// Default conversations directory under the platform data dir.
    pub fn conversations_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("concierge")
            .join("conversations")
    }

    /// Create a fresh conversation in the default directory.
    pub fn create() -> Result<Self> {
        let dir = Self::conversations_dir();
        fs::create_dir_all(&dir)?;
        let id = uuid::Uuid::new_v4().to_string();
        let path = dir.join(format!("{}.jsonl", id));
        Self::create_at(&path, id)
    }

    /// Create a fresh conversation at an explicit path.
    pub fn create_at(path: &Path, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let metadata = StoreEntry::Metadata {
            id: id.clone(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        writeln!(writer, "{}", serde_json::to_string(&metadata)?)?;
        writer.flush()?;

        Ok(Self {
            id,
            path: path.to_path_buf(),
            writer: Some(writer),
            seen: BTreeSet::new(),
        })
    }

    /// Load an existing conversation, returning the store and its history
    /// sorted by timestamp.
    pub fn load(path: &Path) -> Result<(Self, Vec<ChatMessage>)> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut id = String::new();
        let mut messages: Vec<ChatMessage> = Vec::new();
        let mut seen = BTreeSet::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<StoreEntry>(&line) {
                Ok(StoreEntry::Metadata { id: meta_id, .. }) => id = meta_id,
                Ok(StoreEntry::Message { message }) => {
                    if seen.insert(message.timestamp) {
                        messages.push(message);
                    } else {
                        tracing::warn!(
                            timestamp = message.timestamp,
                            "dropping duplicate message record"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping corrupt store line");
                }
            }
        }
        messages.sort_by_key(|m| m.timestamp);

        let file = File::options().append(true).open(path)?;
        let writer = BufWriter::new(file);

        Ok((
            Self {
                id,
                path: path.to_path_buf(),
                writer: Some(writer),
                seen,
            },
            messages,
        ))
    }

    /// Open a conversation file, creating it when absent.
    pub fn open_or_create(path: &Path) -> Result<(Self, Vec<ChatMessage>)> {
        if path.exists() {
            Self::load(path)
        } else {
            let id = uuid::Uuid::new_v4().to_string();
            Ok((Self::create_at(path, id)?, Vec::new()))
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist one message. Transient messages are skipped; a timestamp
    /// already on disk is rejected.
    pub fn save(&mut self, message: &ChatMessage) -> Result<()> {
        if message.transient {
            tracing::debug!("not persisting transient message");
            return Ok(());
        }
        if self.seen.contains(&message.timestamp) {
            return Err(Error::DuplicateTimestamp(message.timestamp));
        }
        if let Some(ref mut writer) = self.writer {
            let entry = StoreEntry::Message {
                message: message.clone(),
            };
            writeln!(writer, "{}", serde_json::to_string(&entry)?)?;
            writer.flush()?;
        }
        self.seen.insert(message.timestamp);
        Ok(())
    }

    /// Purge the conversation: truncate the file down to fresh metadata.
    pub fn clear(&mut self) -> Result<()> {
        self.writer = None;
        let path = self.path.clone();
        let id = self.id.clone();
        *self = Self::create_at(&path, id)?;
        Ok(())
    }
}
