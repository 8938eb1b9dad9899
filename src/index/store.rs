//! Vector store trait and the in-process cosine-similarity store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AgentError;
use crate::reviews::Document;

/// A document together with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// The formatted review.
    pub document: Document,
    /// Embedding of `document.text`.
    pub embedding: Vec<f32>,
}

/// A retrieved document paired with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// The retrieved document.
    pub document: Document,
    /// Similarity to the query (higher is more relevant).
    pub score: f32,
}

/// Storage backend with similarity search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name for logging and errors.
    fn backend(&self) -> &'static str;

    /// Inserts entries, replacing any with the same document id.
    async fn upsert(&self, entries: Vec<IndexedDocument>) -> Result<(), AgentError>;

    /// Returns at most `top_k` documents ordered by descending similarity.
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, AgentError>;

    /// Number of stored documents.
    async fn len(&self) -> usize;

    /// Whether the store holds no documents.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// In-memory vector store ranking by cosine similarity.
///
/// Entries are keyed by document id, so equal scores come back in id order.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<BTreeMap<String, IndexedDocument>>,
}

impl InMemoryVectorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity of two vectors; 0.0 if either has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn backend(&self) -> &'static str {
        "in-memory"
    }

    async fn upsert(&self, entries: Vec<IndexedDocument>) -> Result<(), AgentError> {
        let mut store = self.entries.write().await;
        for entry in entries {
            store.insert(entry.document.id.clone(), entry);
        }
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, AgentError> {
        let store = self.entries.read().await;

        let mut scored = Vec::with_capacity(store.len());
        for entry in store.values() {
            if entry.embedding.len() != embedding.len() {
                return Err(AgentError::VectorStore {
                    backend: self.backend().to_string(),
                    message: format!(
                        "dimension mismatch: query has {}, document {} has {}",
                        embedding.len(),
                        entry.document.id,
                        entry.embedding.len()
                    ),
                });
            }
            scored.push(ScoredDocument {
                document: entry.document.clone(),
                score: cosine_similarity(&entry.embedding, embedding),
            });
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
