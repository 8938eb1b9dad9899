//! On-disk snapshots of a built index.
//!
//! A snapshot stores every document with its embedding plus the embedding
//! model and a fingerprint of the corpus. It is only reused when both match,
//! so editing the dataset or switching models triggers a rebuild.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::store::IndexedDocument;
use crate::error::AgentError;
use crate::reviews::Document;

/// File name of the snapshot inside the index directory.
pub const INDEX_FILE: &str = "index.json";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a built index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Format version.
    pub version: u32,
    /// Embedding model the vectors came from.
    pub embedding_model: String,
    /// Fingerprint of the indexed documents.
    pub fingerprint: String,
    /// Embedding dimensionality.
    pub dimensions: usize,
    /// Documents with their embeddings.
    pub entries: Vec<IndexedDocument>,
}

impl IndexSnapshot {
    /// Path of the snapshot file within `dir`.
    #[must_use]
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(INDEX_FILE)
    }

    /// Reads a snapshot from `dir`. Returns `Ok(None)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Index`] if the file exists but cannot be read
    /// or parsed.
    pub fn load(dir: &Path) -> Result<Option<Self>, AgentError> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|e| AgentError::Index {
            path: path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| AgentError::Index {
                path,
                message: e.to_string(),
            })
    }

    /// Writes the snapshot into `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Index`] on I/O or serialization failure.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, AgentError> {
        let path = Self::path_in(dir);
        let index_err = |message: String| AgentError::Index {
            path: path.clone(),
            message,
        };

        std::fs::create_dir_all(dir).map_err(|e| index_err(e.to_string()))?;
        let content = serde_json::to_string(self).map_err(|e| index_err(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| index_err(e.to_string()))?;
        Ok(path)
    }

    /// Whether this snapshot can stand in for a fresh build.
    #[must_use]
    pub fn matches(&self, embedding_model: &str, fingerprint: &str) -> bool {
        self.version == SNAPSHOT_VERSION
            && self.embedding_model == embedding_model
            && self.fingerprint == fingerprint
    }
}

/// Fingerprints a corpus by document ids and texts, in order.
#[must_use]
pub fn corpus_fingerprint(documents: &[Document]) -> String {
    let mut context = md5::Context::new();
    for doc in documents {
        context.consume(doc.id.as_bytes());
        context.consume([0u8]);
        context.consume(doc.text.as_bytes());
        context.consume([0u8]);
    }
    format!("{:x}", context.compute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::ReviewRecord;
    use crate::reviews::document::format;
    use tempfile::TempDir;

    fn doc(id: u64, text: &str) -> Document {
        format(&ReviewRecord {
            id,
            customer_name: "Ann".to_string(),
            pizza_type: "Margherita".to_string(),
            rating: 5,
            location: "NYC".to_string(),
            date: "2024-01-01".to_string(),
            review_text: text.to_string(),
        })
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let a = corpus_fingerprint(&[doc(1, "Loved it")]);
        let b = corpus_fingerprint(&[doc(1, "Hated it")]);
        assert_ne!(a, b);
        assert_eq!(a, corpus_fingerprint(&[doc(1, "Loved it")]));
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        let nested = dir.path().join("nested/index");
        let documents = vec![doc(1, "Loved it")];
        let snapshot = IndexSnapshot {
            version: SNAPSHOT_VERSION,
            embedding_model: "test-model".to_string(),
            fingerprint: corpus_fingerprint(&documents),
            dimensions: 2,
            entries: vec![IndexedDocument {
                document: documents[0].clone(),
                embedding: vec![0.5, 0.5],
            }],
        };

        let path = snapshot.save(&nested).unwrap_or_else(|_| unreachable!());
        assert!(path.ends_with(INDEX_FILE));

        let loaded = IndexSnapshot::load(&nested)
            .unwrap_or_else(|_| unreachable!())
            .unwrap_or_else(|| unreachable!());
        assert_eq!(loaded.entries, snapshot.entries);
        assert!(loaded.matches("test-model", &snapshot.fingerprint));
        assert!(!loaded.matches("other-model", &snapshot.fingerprint));
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        assert!(matches!(IndexSnapshot::load(dir.path()), Ok(None)));

        std::fs::write(IndexSnapshot::path_in(dir.path()), "{not json")
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            IndexSnapshot::load(dir.path()),
            Err(AgentError::Index { .. })
        ));
    }
}
