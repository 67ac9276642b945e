//! Long-lived user memory storage.
//!
//! Unlike a [`Session`](super::Session), which holds the message history of
//! one conversation, a [`MemoryStore`] holds durable facts about a *user*
//! ("prefers metric units", "works on a Rust codebase") that survive across
//! conversations. Agents typically load relevant memories into their
//! instructions and write new ones as they learn them.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;

/// Seconds since the Unix epoch.
pub(super) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// A single durable memory about a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMemory {
    /// Unique memory id.
    pub id: String,
    /// The user this memory belongs to.
    pub user_id: String,
    /// The remembered fact, as free text.
    pub memory: String,
    /// Topic tags for retrieval.
    pub topics: Vec<String>,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: u64,
    /// Last update time, seconds since the Unix epoch.
    pub updated_at: u64,
}

impl UserMemory {
    /// Creates a memory with a freshly minted id and current timestamps.
    #[must_use]
    pub fn new(user_id: impl Into<String>, memory: impl Into<String>) -> Self {
        let now = now_secs();
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            user_id: user_id.into(),
            memory: memory.into(),
            topics: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the topic tags.
    #[must_use]
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    /// Case-insensitive substring match over the memory text and topics.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.memory.to_lowercase().contains(&needle)
            || self.topics.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

/// Async storage interface for durable user memories.
///
/// `add` upserts by memory id, so callers can update an existing memory by
/// re-adding it with the same id.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Inserts a memory, replacing any existing memory with the same id.
    async fn add(&self, memory: UserMemory) -> Result<()>;

    /// Returns all memories for a user, oldest first.
    async fn get(&self, user_id: &str) -> Result<Vec<UserMemory>>;

    /// Returns the user's memories matching `query`, oldest first.
    ///
    /// Matching is a case-insensitive substring test over text and topics.
    /// `limit` caps the number of results.
    async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<UserMemory>>;

    /// Deletes a memory by id. Returns `true` if a memory was removed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Deletes all memories for a user. Returns how many were removed.
    async fn clear(&self, user_id: &str) -> Result<usize>;
}

/// A memory store shared across tasks.
pub type SharedMemoryStore = Arc<dyn MemoryStore>;

/// In-memory store backed by `tokio::sync::RwLock<Vec<UserMemory>>`.
///
/// Ephemeral; best suited for tests and single-process experiments.
#[derive(Debug, Default)]
pub struct InMemoryMemoryStore {
    memories: RwLock<Vec<UserMemory>>,
}

impl InMemoryMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn add(&self, mut memory: UserMemory) -> Result<()> {
        let mut guard = self.memories.write().await;
        if let Some(existing) = guard.iter_mut().find(|m| m.id == memory.id) {
            memory.created_at = existing.created_at;
            memory.updated_at = now_secs();
            *existing = memory;
        } else {
            guard.push(memory);
        }
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Vec<UserMemory>> {
        let guard = self.memories.read().await;
        Ok(guard
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<UserMemory>> {
        let guard = self.memories.read().await;
        let matches = guard
            .iter()
            .filter(|m| m.user_id == user_id && m.matches(query))
            .cloned();
        Ok(match limit {
            Some(n) => matches.take(n).collect(),
            None => matches.collect(),
        })
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut guard = self.memories.write().await;
        let before = guard.len();
        guard.retain(|m| m.id != id);
        Ok(guard.len() < before)
    }

    async fn clear(&self, user_id: &str) -> Result<usize> {
        let mut guard = self.memories.write().await;
        let before = guard.len();
        guard.retain(|m| m.user_id != user_id);
        Ok(before - guard.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn memory(user: &str, text: &str, topics: &[&str]) -> UserMemory {
        UserMemory::new(user, text)
            .with_topics(topics.iter().map(|&t| t.to_owned()).collect())
    }

    mod user_memory {
        use super::*;

        #[test]
        fn new_mints_unique_ids() {
            let a = UserMemory::new("u1", "likes rust");
            let b = UserMemory::new("u1", "likes rust");
            assert_ne!(a.id, b.id);
            assert_eq!(a.user_id, "u1");
            assert_eq!(a.created_at, a.updated_at);
        }

        #[test]
        fn matches_text_case_insensitively() {
            let m = memory("u1", "Prefers metric units", &[]);
            assert!(m.matches("METRIC"));
            assert!(!m.matches("imperial"));
        }

        #[test]
        fn matches_topics() {
            let m = memory("u1", "working on a parser", &["rust", "compilers"]);
            assert!(m.matches("compiler"));
        }

        #[test]
        fn serde_round_trip() {
            let m = memory("u1", "note", &["tag"]);
            let json = serde_json::to_string(&m).unwrap();
            let back: UserMemory = serde_json::from_str(&json).unwrap();
            assert_eq!(m, back);
        }
    }

    mod in_memory_store {
        use super::*;

        #[tokio::test]
        async fn add_and_get_filters_by_user() {
            let store = InMemoryMemoryStore::new();
            store.add(memory("alice", "likes tea", &[])).await.unwrap();
            store.add(memory("bob", "likes coffee", &[])).await.unwrap();

            let alice = store.get("alice").await.unwrap();
            assert_eq!(alice.len(), 1);
            assert_eq!(alice[0].memory, "likes tea");
        }

        #[tokio::test]
        async fn add_upserts_by_id() {
            let store = InMemoryMemoryStore::new();
            let original = memory("alice", "likes tea", &[]);
            let id = original.id.clone();
            store.add(original).await.unwrap();

            let mut updated = memory("alice", "prefers green tea", &[]);
            updated.id = id;
            store.add(updated).await.unwrap();

            let all = store.get("alice").await.unwrap();
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].memory, "prefers green tea");
        }

        #[tokio::test]
        async fn search_matches_text_and_topics() {
            let store = InMemoryMemoryStore::new();
            store
                .add(memory("u", "enjoys hiking", &["outdoors"]))
                .await
                .unwrap();
            store
                .add(memory("u", "allergic to peanuts", &["health"]))
                .await
                .unwrap();

            let hits = store.search("u", "outdoors", None).await.unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].memory, "enjoys hiking");
        }

        #[tokio::test]
        async fn search_respects_limit() {
            let store = InMemoryMemoryStore::new();
            for i in 0..5 {
                store
                    .add(memory("u", &format!("note {i}"), &[]))
                    .await
                    .unwrap();
            }
            let hits = store.search("u", "note", Some(2)).await.unwrap();
            assert_eq!(hits.len(), 2);
        }

        #[tokio::test]
        async fn delete_removes_by_id() {
            let store = InMemoryMemoryStore::new();
            let m = memory("u", "temp", &[]);
            let id = m.id.clone();
            store.add(m).await.unwrap();

            assert!(store.delete(&id).await.unwrap());
            assert!(!store.delete(&id).await.unwrap());
            assert!(store.get("u").await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn clear_removes_only_that_user() {
            let store = InMemoryMemoryStore::new();
            store.add(memory("alice", "one", &[])).await.unwrap();
            store.add(memory("alice", "two", &[])).await.unwrap();
            store.add(memory("bob", "keep", &[])).await.unwrap();

            assert_eq!(store.clear("alice").await.unwrap(), 2);
            assert_eq!(store.get("bob").await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn usable_as_trait_object() {
            let store: SharedMemoryStore = Arc::new(InMemoryMemoryStore::new());
            store.add(memory("u", "shared", &[])).await.unwrap();
            assert_eq!(store.get("u").await.unwrap().len(), 1);
        }
    }
}
