//! Embedding provider trait.
//!
//! Implementations turn text into vectors. The index calls
//! [`EmbeddingProvider::embed`] once per batch of documents at build time and
//! once per question at search time.

use async_trait::async_trait;

use crate::error::AgentError;

/// Trait for text-embedding backends.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`).
    fn name(&self) -> &'static str;

    /// Embedding model identifier. Persisted indexes are only reused when
    /// this matches the model they were built with.
    fn model(&self) -> &str;

    /// Embeds a batch of texts, returning one vector per input in order.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Embedding`] on API failures or malformed
    /// responses.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AgentError>;
}
