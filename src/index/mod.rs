//! Retrieval index: embedding and vector-store abstractions plus the
//! [`ReviewIndex`] adapter that ties them to review documents.
//!
//! ```text
//! documents ─► EmbeddingProvider::embed ─► VectorStore::upsert
//! question  ─► EmbeddingProvider::embed ─► VectorStore::search ─► ScoredDocument[]
//! ```

pub mod embedding;
pub mod persist;
pub mod review_index;
pub mod store;

pub use embedding::EmbeddingProvider;
pub use persist::{INDEX_FILE, IndexSnapshot, corpus_fingerprint};
pub use review_index::{BuildReport, BuildSource, ReviewIndex};
pub use store::{InMemoryVectorStore, IndexedDocument, ScoredDocument, VectorStore, cosine_similarity};
