//! Knowledge snippets: short user-saved notes used to ground suggestions.
//!
//! Providers return snippets ranked most-recent-first. The coach only ever
//! looks at the top one.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSnippet {
    pub id: u64,
    pub text: String,
    /// Unix millis when the snippet was saved.
    pub timestamp_ms: i64,
}

#[async_trait]
pub trait KnowledgeProvider: Send + Sync {
    /// Up to `limit` snippets, newest first.
    async fn latest_snippets(&self, limit: usize) -> Result<Vec<KnowledgeSnippet>>;
}

/// Process-local snippet store.
pub struct InMemoryKnowledgeStore {
    snippets: RwLock<VecDeque<KnowledgeSnippet>>,
    next_id: AtomicU64,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self {
            snippets: RwLock::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Save a snippet. Returns the stored entry.
    pub async fn add_snippet(&self, text: &str) -> KnowledgeSnippet {
        let snippet = KnowledgeSnippet {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            text: text.to_string(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        };
        self.snippets.write().await.push_front(snippet.clone());
        tracing::info!(id = snippet.id, "knowledge snippet added");
        snippet
    }

    /// All snippets, newest first.
    pub async fn all_snippets(&self) -> Vec<KnowledgeSnippet> {
        self.snippets.read().await.iter().cloned().collect()
    }

    pub async fn clear(&self) {
        self.snippets.write().await.clear();
        tracing::info!("knowledge snippets cleared");
    }
}

impl Default for InMemoryKnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeProvider for InMemoryKnowledgeStore {
    async fn latest_snippets(&self, limit: usize) -> Result<Vec<KnowledgeSnippet>> {
        Ok(self
            .snippets
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }
}
