//! # Reagent Memory
//!
//! Conversation memory for the Reagent agent runtime.
//!
//! Memory is append-only per conversation; the loop reads a token-bounded
//! *window* of recent history when building each prompt. When older
//! entries fall out of the window, an optional [`Summarizer`] condenses
//! them into a single entry so long conversations keep their gist.

use async_trait::async_trait;

use reagent_core::{ConversationId, MemoryEntry, MemoryError};

pub mod in_memory;

pub use in_memory::InMemoryStore;

/// The conversation memory collaborator trait.
///
/// Implementations must preserve insertion order: `history` and `window`
/// both return entries oldest-first.
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// Append an entry to a conversation. Creates the conversation if it
    /// does not exist yet.
    async fn append(
        &self,
        id: &ConversationId,
        entry: MemoryEntry,
    ) -> Result<(), MemoryError>;

    /// Append a completed user/assistant exchange as one atomic write.
    /// Concurrent turns on the same conversation must not be able to
    /// interleave between the two entries.
    async fn append_turn(
        &self,
        id: &ConversationId,
        user: MemoryEntry,
        assistant: MemoryEntry,
    ) -> Result<(), MemoryError>;

    /// The most recent entries whose estimated token total fits within
    /// `max_tokens`, oldest-first. Entries are dropped oldest-first; if a
    /// summarizer is attached, the dropped entries are condensed into a
    /// leading summary entry instead of vanishing.
    async fn window(
        &self,
        id: &ConversationId,
        max_tokens: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError>;

    /// The full history of a conversation, oldest-first. Empty for an
    /// unknown conversation.
    async fn history(&self, id: &ConversationId) -> Result<Vec<MemoryEntry>, MemoryError>;

    /// Remove all entries for a conversation.
    async fn clear(&self, id: &ConversationId) -> Result<(), MemoryError>;
}

/// Condenses evicted history entries into a short summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, entries: &[MemoryEntry]) -> Result<String, MemoryError>;
}
