//! In-memory conversation store.
//!
//! Backed by `RwLock<HashMap>`. Suitable for single-process use and tests;
//! nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use reagent_core::token::estimate_entry_tokens;
use reagent_core::{ConversationId, MemoryEntry, MemoryError};

use crate::{ConversationMemory, Summarizer};

/// In-memory conversation store with optional eviction summarization.
#[derive(Default)]
pub struct InMemoryStore {
    conversations: RwLock<HashMap<ConversationId, Vec<MemoryEntry>>>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a summarizer used to condense entries that fall outside the
    /// window.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Number of entries stored for a conversation.
    pub async fn len(&self, id: &ConversationId) -> usize {
        self.conversations
            .read()
            .await
            .get(id)
            .map(|v| v.len())
            .unwrap_or(0)
    }

    pub async fn is_empty(&self, id: &ConversationId) -> bool {
        self.len(id).await == 0
    }
}

#[async_trait]
impl ConversationMemory for InMemoryStore {
    async fn append(
        &self,
        id: &ConversationId,
        entry: MemoryEntry,
    ) -> Result<(), MemoryError> {
        let mut conversations = self.conversations.write().await;
        conversations.entry(id.clone()).or_default().push(entry);
        Ok(())
    }

    async fn append_turn(
        &self,
        id: &ConversationId,
        user: MemoryEntry,
        assistant: MemoryEntry,
    ) -> Result<(), MemoryError> {
        // Both entries land under one lock acquisition so another turn
        // cannot slip between them.
        let mut conversations = self.conversations.write().await;
        let entries = conversations.entry(id.clone()).or_default();
        entries.push(user);
        entries.push(assistant);
        Ok(())
    }

    async fn window(
        &self,
        id: &ConversationId,
        max_tokens: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        let entries = self.history(id).await?;
        if entries.is_empty() {
            return Ok(entries);
        }

        // Walk backwards from the newest entry until the budget is spent.
        let mut remaining = max_tokens;
        let mut cut = entries.len();
        for (i, entry) in entries.iter().enumerate().rev() {
            let cost = estimate_entry_tokens(entry);
            if cost > remaining {
                break;
            }
            remaining -= cost;
            cut = i;
        }

        if cut == 0 {
            return Ok(entries);
        }

        let (evicted, kept) = entries.split_at(cut);
        tracing::debug!(
            conversation = %id,
            evicted = evicted.len(),
            kept = kept.len(),
            "history window truncated"
        );

        let mut window = Vec::with_capacity(kept.len() + 1);
        if let Some(summarizer) = &self.summarizer {
            let summary = summarizer.summarize(evicted).await?;
            window.push(MemoryEntry::assistant(format!(
                "(Summary of earlier conversation) {}",
                summary
            )));
        }
        window.extend_from_slice(kept);
        Ok(window)
    }

    async fn history(&self, id: &ConversationId) -> Result<Vec<MemoryEntry>, MemoryError> {
        Ok(self
            .conversations
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn clear(&self, id: &ConversationId) -> Result<(), MemoryError> {
        self.conversations.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reagent_core::Role;

    struct HeadlineSummarizer;

    #[async_trait]
    impl Summarizer for HeadlineSummarizer {
        async fn summarize(&self, entries: &[MemoryEntry]) -> Result<String, MemoryError> {
            Ok(format!("{} earlier messages", entries.len()))
        }
    }

    #[tokio::test]
    async fn append_and_history_preserve_order() {
        let store = InMemoryStore::new();
        let id = ConversationId::new();

        store.append(&id, MemoryEntry::user("first")).await.unwrap();
        store
            .append(&id, MemoryEntry::assistant("second"))
            .await
            .unwrap();

        let history = store.history(&id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].content, "second");
    }

    #[tokio::test]
    async fn concurrent_turn_appends_never_interleave() {
        let store = Arc::new(InMemoryStore::new());
        let id = ConversationId::new();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append_turn(
                        &id,
                        MemoryEntry::user(format!("question {}", i)),
                        MemoryEntry::assistant(format!("answer {}", i)),
                    )
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let history = store.history(&id).await.unwrap();
        assert_eq!(history.len(), 16);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
            // Each answer sits right after its own question.
            let n = pair[0].content.rsplit(' ').next().unwrap();
            assert_eq!(pair[1].content, format!("answer {}", n));
        }
    }

    #[tokio::test]
    async fn unknown_conversation_has_empty_history() {
        let store = InMemoryStore::new();
        let history = store.history(&ConversationId::new()).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn window_keeps_newest_entries() {
        let store = InMemoryStore::new();
        let id = ConversationId::new();

        // Each entry: 24 chars of content = 6 tokens + 4 overhead = 10.
        for i in 0..10 {
            store
                .append(&id, MemoryEntry::user(format!("message number {:>9}", i)))
                .await
                .unwrap();
        }

        let window = store.window(&id, 33).await.unwrap();
        assert_eq!(window.len(), 3);
        assert!(window[0].content.ends_with("7"));
        assert!(window[2].content.ends_with("9"));
    }

    #[tokio::test]
    async fn window_with_ample_budget_returns_everything() {
        let store = InMemoryStore::new();
        let id = ConversationId::new();
        store.append(&id, MemoryEntry::user("hello")).await.unwrap();
        store
            .append(&id, MemoryEntry::assistant("hi there"))
            .await
            .unwrap();

        let window = store.window(&id, 10_000).await.unwrap();
        assert_eq!(window.len(), 2);
    }

    #[tokio::test]
    async fn eviction_substitutes_summary_when_configured() {
        let store = InMemoryStore::new().with_summarizer(Arc::new(HeadlineSummarizer));
        let id = ConversationId::new();

        for i in 0..10 {
            store
                .append(&id, MemoryEntry::user(format!("message number {:>9}", i)))
                .await
                .unwrap();
        }

        let window = store.window(&id, 33).await.unwrap();
        // Summary entry plus the 3 newest messages.
        assert_eq!(window.len(), 4);
        assert!(window[0]
            .content
            .contains("(Summary of earlier conversation) 7 earlier messages"));
    }

    #[tokio::test]
    async fn clear_removes_conversation() {
        let store = InMemoryStore::new();
        let id = ConversationId::new();
        store.append(&id, MemoryEntry::user("hello")).await.unwrap();
        store.clear(&id).await.unwrap();
        assert!(store.is_empty(&id).await);
    }
}
