//! Answer orchestrator.
//!
//! Composes retrieval and generation for a single question:
//! retrieve top-k reviews → assemble prompt → generate → attach sources.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::config::AgentConfig;
use super::message::{ChatRequest, system_message, user_message};
use super::prompt::{PromptSet, build_answer_prompt};
use super::provider::LlmProvider;
use super::result::QueryResult;
use crate::error::AgentError;
use crate::index::{BuildReport, ReviewIndex};
use crate::reviews::Document;

/// Maximum accepted question length in bytes.
pub const MAX_QUESTION_LEN: usize = 10_000;

/// Answers questions from a [`ReviewIndex`] and a generation provider.
pub struct AnswerOrchestrator {
    index: ReviewIndex,
    generator: Arc<dyn LlmProvider>,
    prompts: PromptSet,
    model: String,
    temperature: f32,
    max_tokens: u32,
    top_k: usize,
}

impl AnswerOrchestrator {
    /// Creates an orchestrator with the given index, provider, and configuration.
    ///
    /// Loads the system prompt from [`AgentConfig::prompt_dir`], falling back
    /// to the compiled-in default.
    pub fn new(index: ReviewIndex, generator: Arc<dyn LlmProvider>, config: &AgentConfig) -> Self {
        Self {
            index,
            generator,
            prompts: PromptSet::load(config.prompt_dir.as_deref()),
            model: config.generation_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_k: config.top_k,
        }
    }

    /// Replaces the prompt set.
    #[must_use]
    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    /// The underlying index.
    #[must_use]
    pub const fn index(&self) -> &ReviewIndex {
        &self.index
    }

    /// Number of reviews retrieved per question.
    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Builds the underlying index from `documents`.
    ///
    /// # Errors
    ///
    /// See [`ReviewIndex::build`].
    pub async fn build_index(&mut self, documents: &[Document]) -> Result<BuildReport, AgentError> {
        self.index.build(documents).await
    }

    /// Answers a question.
    ///
    /// # Steps
    ///
    /// 1. Validate the question
    /// 2. Retrieve the top-k most similar reviews
    /// 3. Assemble the retrieved texts and the question into one prompt
    /// 4. Generate the answer
    /// 5. Attach the retrieved reviews as sources
    ///
    /// # Errors
    ///
    /// - [`AgentError::EmptyQuestion`] / [`AgentError::QuestionTooLong`]
    /// - [`AgentError::NotReady`] if the index has not been built; no
    ///   external call is made in that case
    /// - embedding, store, and generation failures, unretried
    pub async fn answer(&self, question: &str) -> Result<QueryResult, AgentError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AgentError::EmptyQuestion);
        }
        if question.len() > MAX_QUESTION_LEN {
            return Err(AgentError::QuestionTooLong {
                len: question.len(),
                max: MAX_QUESTION_LEN,
            });
        }
        if !self.index.is_built() {
            return Err(AgentError::NotReady);
        }

        let start = Instant::now();

        let sources = self.index.search(question, self.top_k).await?;
        debug!(retrieved = sources.len(), top_k = self.top_k, "retrieved reviews");

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                system_message(&self.prompts.answer),
                user_message(&build_answer_prompt(question, &sources)),
            ],
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        };

        let response = self.generator.chat(&request).await?;
        debug!(
            provider = self.generator.name(),
            total_tokens = response.usage.total_tokens,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            "answer generated"
        );

        Ok(QueryResult {
            question: question.to_string(),
            answer: response.content,
            source_reviews: sources,
            model: self.model.clone(),
            usage: response.usage,
            finish_reason: response.finish_reason,
            elapsed: start.elapsed(),
        })
    }
}

impl std::fmt::Debug for AnswerOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerOrchestrator")
            .field("index", &self.index)
            .field("generator", &self.generator.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}
