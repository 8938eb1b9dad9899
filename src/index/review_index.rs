//! Retrieval index over formatted review documents.
//!
//! [`ReviewIndex`] owns no ranking logic. It sends document texts to an
//! [`EmbeddingProvider`], hands the vectors to a [`VectorStore`], and turns
//! search requests into embed-then-search calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::embedding::EmbeddingProvider;
use super::persist::{IndexSnapshot, SNAPSHOT_VERSION, corpus_fingerprint};
use super::store::{IndexedDocument, ScoredDocument, VectorStore};
use crate::error::{AgentError, DataError};
use crate::reviews::Document;

/// Default number of texts sent per embedding request.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 128;

/// How an index build was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSource {
    /// Documents were embedded through the provider.
    Embedded,
    /// Vectors were reused from a persisted snapshot.
    Reused,
}

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of indexed documents.
    pub documents: usize,
    /// Embedding dimensionality.
    pub dimensions: usize,
    /// Where the vectors came from.
    pub source: BuildSource,
}

/// Searchable index of review documents.
pub struct ReviewIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    persist_dir: Option<PathBuf>,
    batch_size: usize,
    document_count: usize,
}

impl ReviewIndex {
    /// Creates an unbuilt index over the given embedding and store backends.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            persist_dir: None,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
            document_count: 0,
        }
    }

    /// Persists builds to (and reuses them from) `dir`.
    #[must_use]
    pub fn with_persist_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.persist_dir = Some(dir.into());
        self
    }

    /// Sets the number of texts per embedding request (minimum 1).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Directory used for persistence, if any.
    #[must_use]
    pub fn persist_dir(&self) -> Option<&Path> {
        self.persist_dir.as_deref()
    }

    /// Whether [`ReviewIndex::build`] has completed.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.document_count > 0
    }

    /// Number of indexed documents (0 before building).
    #[must_use]
    pub const fn document_count(&self) -> usize {
        self.document_count
    }

    /// Builds the index from `documents`.
    ///
    /// With a persist directory, a snapshot built from the same embedding
    /// model and corpus is loaded instead of calling the embedding service;
    /// otherwise the fresh build is written back to the directory.
    ///
    /// # Errors
    ///
    /// - [`AgentError::Data`] with [`DataError::NoRecords`] if `documents`
    ///   is empty
    /// - [`AgentError::Embedding`] if the provider fails or returns the wrong
    ///   number of vectors
    /// - [`AgentError::Index`] if a fresh build cannot be persisted
    pub async fn build(&mut self, documents: &[Document]) -> Result<BuildReport, AgentError> {
        if documents.is_empty() {
            return Err(DataError::NoRecords.into());
        }

        let fingerprint = corpus_fingerprint(documents);
        if let Some(snapshot) = self.reusable_snapshot(&fingerprint) {
            let report = BuildReport {
                documents: snapshot.entries.len(),
                dimensions: snapshot.dimensions,
                source: BuildSource::Reused,
            };
            self.store.upsert(snapshot.entries).await?;
            self.check_store_len(documents.len()).await?;
            self.document_count = report.documents;
            info!(
                documents = report.documents,
                backend = self.store.backend(),
                "reused persisted index"
            );
            return Ok(report);
        }

        let entries = self.embed_documents(documents).await?;
        let dimensions = entries.first().map_or(0, |e| e.embedding.len());

        if let Some(dir) = &self.persist_dir {
            let snapshot = IndexSnapshot {
                version: SNAPSHOT_VERSION,
                embedding_model: self.embedder.model().to_string(),
                fingerprint,
                dimensions,
                entries: entries.clone(),
            };
            let path = snapshot.save(dir)?;
            debug!(path = %path.display(), "persisted index snapshot");
        }

        self.store.upsert(entries).await?;
        self.check_store_len(documents.len()).await?;
        self.document_count = documents.len();
        info!(
            documents = documents.len(),
            dimensions,
            model = self.embedder.model(),
            backend = self.store.backend(),
            "built retrieval index"
        );

        Ok(BuildReport {
            documents: documents.len(),
            dimensions,
            source: BuildSource::Embedded,
        })
    }

    /// Returns at most `top_k` documents most similar to `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotInitialized`] before a successful build, and
    /// propagates embedding and store failures.
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, AgentError> {
        if !self.is_built() {
            return Err(AgentError::NotInitialized);
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Embedding {
                provider: self.embedder.name().to_string(),
                message: "no embedding returned for query".to_string(),
            })?;

        let results = self.store.search(&query_embedding, top_k).await?;
        debug!(top_k, returned = results.len(), "similarity search complete");
        Ok(results)
    }

    /// Every document must occupy its own slot in the store.
    async fn check_store_len(&self, expected: usize) -> Result<(), AgentError> {
        let stored = self.store.len().await;
        if stored == expected {
            return Ok(());
        }
        Err(AgentError::VectorStore {
            backend: self.store.backend().to_string(),
            message: format!("expected {expected} indexed documents, store holds {stored}"),
        })
    }

    fn reusable_snapshot(&self, fingerprint: &str) -> Option<IndexSnapshot> {
        let dir = self.persist_dir.as_deref()?;
        match IndexSnapshot::load(dir) {
            Ok(Some(snapshot)) if snapshot.matches(self.embedder.model(), fingerprint) => {
                Some(snapshot)
            }
            Ok(Some(_)) => {
                info!(dir = %dir.display(), "persisted index is stale, rebuilding");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable persisted index");
                None
            }
        }
    }

    async fn embed_documents(
        &self,
        documents: &[Document],
    ) -> Result<Vec<IndexedDocument>, AgentError> {
        let mut entries = Vec::with_capacity(documents.len());

        for batch in documents.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|d| d.text.clone()).collect();
            let embeddings = self.embedder.embed(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(AgentError::Embedding {
                    provider: self.embedder.name().to_string(),
                    message: format!(
                        "expected {} embeddings, received {}",
                        batch.len(),
                        embeddings.len()
                    ),
                });
            }
            debug!(batch = batch.len(), "embedded document batch");
            entries.extend(
                batch
                    .iter()
                    .zip(embeddings)
                    .map(|(document, embedding)| IndexedDocument {
                        document: document.clone(),
                        embedding,
                    }),
            );
        }

        Ok(entries)
    }
}

impl std::fmt::Debug for ReviewIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewIndex")
            .field("embedder", &self.embedder.name())
            .field("store", &self.store.backend())
            .field("persist_dir", &self.persist_dir)
            .field("document_count", &self.document_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::store::InMemoryVectorStore;
    use crate::reviews::ReviewRecord;
    use crate::reviews::document::format_all;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const VOCAB: [&str; 4] = ["margherita", "pepperoni", "hawaiian", "crust"];

    /// Counts vocabulary words; deterministic and offline.
    #[derive(Default)]
    struct KeywordEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        fn name(&self) -> &'static str {
            "keyword"
        }

        fn model(&self) -> &str {
            "keyword-v1"
        }

        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    VOCAB
                        .iter()
                        .map(|w| if lower.contains(w) { 1.0 } else { 0.0 })
                        .collect()
                })
                .collect())
        }
    }

    fn documents() -> Vec<Document> {
        let rows = [
            (1, "Margherita", "Fresh basil"),
            (2, "Pepperoni", "Spicy and crispy crust"),
            (3, "Hawaiian", "Too sweet"),
        ];
        let records: Vec<ReviewRecord> = rows
            .iter()
            .map(|(id, pizza, text)| ReviewRecord {
                id: *id,
                customer_name: "Ann".to_string(),
                pizza_type: (*pizza).to_string(),
                rating: 4,
                location: "NYC".to_string(),
                date: "2024-01-01".to_string(),
                review_text: (*text).to_string(),
            })
            .collect();
        format_all(&records)
    }

    fn index(embedder: &Arc<KeywordEmbedder>) -> ReviewIndex {
        ReviewIndex::new(embedder.clone(), Arc::new(InMemoryVectorStore::new()))
    }

    #[tokio::test]
    async fn test_search_before_build() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let index = index(&embedder);
        let result = index.search("margherita", 5).await;
        assert!(matches!(result, Err(AgentError::NotInitialized)));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_build_empty_corpus() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let mut index = index(&embedder);
        let result = index.build(&[]).await;
        assert!(matches!(
            result,
            Err(AgentError::Data(DataError::NoRecords))
        ));
        assert!(!index.is_built());
    }

    #[tokio::test]
    async fn test_build_rejects_colliding_document_ids() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let mut index = index(&embedder);
        let mut docs = documents();
        docs[1].id = docs[0].id.clone();

        let result = index.build(&docs).await;

        assert!(matches!(result, Err(AgentError::VectorStore { .. })));
        assert!(!index.is_built());
    }

    #[tokio::test]
    async fn test_build_batches_and_search() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let mut index = index(&embedder).with_batch_size(2);
        let report = index
            .build(&documents())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(report.documents, 3);
        assert_eq!(report.dimensions, VOCAB.len());
        assert_eq!(report.source, BuildSource::Embedded);
        // 3 documents in batches of 2
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);

        let results = index
            .search("Which Hawaiian pizza?", 2)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.id, "3");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_search_zero_k_makes_no_call() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let mut index = index(&embedder);
        index
            .build(&documents())
            .await
            .unwrap_or_else(|_| unreachable!());
        let calls = embedder.calls.load(Ordering::SeqCst);
        let results = index
            .search("anything", 0)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(results.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_persisted_index_is_reused() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());

        let first = Arc::new(KeywordEmbedder::default());
        let mut index_a = index(&first).with_persist_dir(dir.path());
        index_a
            .build(&documents())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);

        let second = Arc::new(KeywordEmbedder::default());
        let mut index_b = index(&second).with_persist_dir(dir.path());
        let report = index_b
            .build(&documents())
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(report.source, BuildSource::Reused);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
        assert_eq!(index_b.document_count(), 3);
    }

    #[tokio::test]
    async fn test_stale_persisted_index_is_rebuilt() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        let embedder = Arc::new(KeywordEmbedder::default());

        let mut docs = documents();
        index(&embedder)
            .with_persist_dir(dir.path())
            .build(&docs)
            .await
            .unwrap_or_else(|_| unreachable!());

        docs.truncate(2);
        let report = index(&embedder)
            .with_persist_dir(dir.path())
            .build(&docs)
            .await
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(report.source, BuildSource::Embedded);
        assert_eq!(report.documents, 2);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    }
}
