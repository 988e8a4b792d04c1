//! Conversation domain types.
//!
//! A conversation is an ordered, chronological sequence of [`MemoryEntry`]
//! values keyed by [`ConversationId`]. The agent loop reads a windowed
//! slice of this history to build context and appends to it as turns
//! complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of an entry in conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The agent's answer
    Assistant,
}

/// A single entry in conversation history.
///
/// Insertion order equals chronological order; the timestamp is carried
/// for diagnostics, not for ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Who produced this entry
    pub role: Role,

    /// The text content
    pub content: String,

    /// When this entry was recorded
    pub timestamp: DateTime<Utc>,
}

impl MemoryEntry {
    /// Create a new user entry.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant entry.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Render this entry as a transcript line (`User: ...` / `Assistant: ...`).
    pub fn transcript_line(&self) -> String {
        let prefix = match self.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        format!("{}: {}", prefix, self.content)
    }
}
