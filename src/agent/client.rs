//! Provider registry and factory.
//!
//! Maps provider names to concrete generation and embedding backends.

use std::sync::Arc;

use crate::agent::config::AgentConfig;
use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;
use crate::index::EmbeddingProvider;

/// The external services an agent talks to.
#[derive(Clone)]
pub struct Providers {
    /// Answer generation backend.
    pub generator: Arc<dyn LlmProvider>,
    /// Text embedding backend.
    pub embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("generator", &self.generator.name())
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

/// Creates providers based on the configured provider name.
///
/// # Supported Providers
///
/// - `"openai"` (default): OpenAI-compatible APIs via `async-openai`
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] for unknown provider names.
pub fn create_providers(config: &AgentConfig) -> Result<Providers, AgentError> {
    match config.provider.as_str() {
        "openai" => {
            let provider = Arc::new(OpenAiProvider::new(config));
            Ok(Providers {
                generator: provider.clone(),
                embedder: provider,
            })
        }
        other => Err(AgentError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}
