//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AgentError;

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Default generation model.
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";
/// Default number of reviews retrieved per question.
pub const DEFAULT_TOP_K: usize = 5;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
/// Default maximum tokens for a generated answer.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Default directory for the persisted index, relative to the working directory.
pub const DEFAULT_INDEX_DIR: &str = ".pizza-review-agent/index";

/// Configuration for the review agent.
#[derive(Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model used to embed reviews and questions.
    pub embedding_model: String,
    /// Model used to generate answers.
    pub generation_model: String,
    /// Directory the built index is persisted to. `None` disables persistence.
    pub index_dir: Option<PathBuf>,
    /// Number of reviews retrieved per question.
    pub top_k: usize,
    /// Sampling temperature for answer generation.
    pub temperature: f32,
    /// Maximum tokens for a generated answer.
    pub max_tokens: u32,
    /// Directory containing prompt template overrides.
    pub prompt_dir: Option<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("embedding_model", &self.embedding_model)
            .field("generation_model", &self.generation_model)
            .field("index_dir", &self.index_dir)
            .field("top_k", &self.top_k)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("prompt_dir", &self.prompt_dir)
            .finish()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    embedding_model: Option<String>,
    generation_model: Option<String>,
    index_dir: Option<PathBuf>,
    persist: Option<bool>,
    top_k: Option<usize>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    prompt_dir: Option<PathBuf>,
    invalid_env: Vec<String>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("PIZZA_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty());
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL").ok();
        }
        if self.embedding_model.is_none() {
            self.embedding_model = std::env::var("EMBEDDING_MODEL").ok();
        }
        if self.generation_model.is_none() {
            self.generation_model = std::env::var("LLM_MODEL").ok();
        }
        if self.index_dir.is_none() {
            self.index_dir = std::env::var("PIZZA_INDEX_DIR").ok().map(PathBuf::from);
        }
        if self.top_k.is_none() {
            let raw = std::env::var("PIZZA_TOP_K").ok();
            self.top_k = self.parse_env("PIZZA_TOP_K", raw);
        }
        if self.temperature.is_none() {
            let raw = std::env::var("PIZZA_TEMPERATURE").ok();
            self.temperature = self.parse_env("PIZZA_TEMPERATURE", raw);
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = std::env::var("PIZZA_PROMPT_DIR").ok().map(PathBuf::from);
        }
        self
    }

    /// Parses a numeric environment value, recording unparsable input for
    /// [`AgentConfigBuilder::build`] to report.
    fn parse_env<T: FromStr>(&mut self, name: &str, raw: Option<String>) -> Option<T> {
        let raw = raw?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.invalid_env.push(format!("{name}={raw:?} is not a valid number"));
                None
            }
        }
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the embedding model.
    #[must_use]
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Sets the generation model.
    #[must_use]
    pub fn generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = Some(model.into());
        self
    }

    /// Sets the index persistence directory.
    #[must_use]
    pub fn index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.index_dir = Some(dir.into());
        self
    }

    /// Enables or disables index persistence.
    #[must_use]
    pub const fn persist(mut self, persist: bool) -> Self {
        self.persist = Some(persist);
        self
    }

    /// Sets the number of reviews retrieved per question.
    #[must_use]
    pub const fn top_k(mut self, n: usize) -> Self {
        self.top_k = Some(n);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the answer max tokens.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set, and
    /// [`AgentError::InvalidConfig`] for an unparsable `PIZZA_TOP_K` or
    /// `PIZZA_TEMPERATURE`, a zero `top_k`, or a temperature outside
    /// `0.0..=2.0`.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;

        if let Some(message) = self.invalid_env.into_iter().next() {
            return Err(AgentError::InvalidConfig { message });
        }

        let top_k = self.top_k.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(AgentError::InvalidConfig {
                message: "top_k must be at least 1".to_string(),
            });
        }

        let temperature = self.temperature.unwrap_or(DEFAULT_TEMPERATURE);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AgentError::InvalidConfig {
                message: format!("temperature {temperature} is outside 0.0..=2.0"),
            });
        }

        let index_dir = if self.persist.unwrap_or(true) {
            Some(
                self.index_dir
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_DIR)),
            )
        } else {
            None
        };

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            embedding_model: self
                .embedding_model
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            generation_model: self
                .generation_model
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            index_dir,
            top_k,
            temperature,
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            prompt_dir: self.prompt_dir,
        })
    }
}
