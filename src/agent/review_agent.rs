//! The review agent facade.
//!
//! Sequences loader → formatter → index → orchestrator and exposes a single
//! question-answering entry point plus an interactive read-answer loop.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use super::client::create_providers;
use super::config::AgentConfig;
use super::orchestrator::AnswerOrchestrator;
use super::provider::LlmProvider;
use super::result::QueryResult;
use crate::error::{AgentError, Result};
use crate::index::{EmbeddingProvider, InMemoryVectorStore, ReviewIndex};
use crate::reviews::{DatasetStatistics, ReviewLoader};

/// Inputs that end the interactive loop (compared case-insensitively).
pub const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "q"];

/// Example questions shown when the interactive loop starts.
const EXAMPLE_QUESTIONS: [&str; 5] = [
    "What do customers think about the Margherita pizza?",
    "Which pizza has the best reviews?",
    "What are common complaints about delivery?",
    "How do reviews differ between locations?",
    "Which pizzas are described as too salty or greasy?",
];

/// Where the agent is in its setup.
///
/// Transitions only move forward; there is no reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Lifecycle {
    /// Nothing has been read yet.
    Uninitialized,
    /// Reviews are loaded and validated.
    Loaded,
    /// The review index is built.
    Indexed,
    /// Questions can be answered.
    Ready,
}

/// Answers questions about a review dataset.
#[derive(Debug)]
pub struct ReviewAgent {
    loader: ReviewLoader,
    orchestrator: AnswerOrchestrator,
    lifecycle: Lifecycle,
}

impl ReviewAgent {
    /// Creates an agent from explicit providers, backed by an in-memory store.
    ///
    /// The index is persisted to [`AgentConfig::index_dir`] when set.
    pub fn new(
        config: &AgentConfig,
        loader: ReviewLoader,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn LlmProvider>,
    ) -> Self {
        let mut index = ReviewIndex::new(embedder, Arc::new(InMemoryVectorStore::new()));
        if let Some(dir) = &config.index_dir {
            index = index.with_persist_dir(dir);
        }
        Self {
            loader,
            orchestrator: AnswerOrchestrator::new(index, generator, config),
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    /// Creates an agent wired to the configured provider.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnsupportedProvider`] for unknown provider names.
    pub fn from_config(
        config: &AgentConfig,
        loader: ReviewLoader,
    ) -> std::result::Result<Self, AgentError> {
        let providers = create_providers(config)?;
        Ok(Self::new(config, loader, providers.embedder, providers.generator))
    }

    /// Current lifecycle stage.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether questions can be answered.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    /// Number of retrieved reviews per question.
    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.orchestrator.top_k()
    }

    /// Number of documents in the built index (0 before initialization).
    #[must_use]
    pub const fn indexed_documents(&self) -> usize {
        self.orchestrator.index().document_count()
    }

    /// Loads and validates the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Data`] if the dataset is missing or invalid.
    pub fn load(&mut self) -> std::result::Result<usize, AgentError> {
        let count = self.loader.load()?.len();
        self.advance(Lifecycle::Loaded);
        Ok(count)
    }

    /// Dataset statistics, loading the dataset first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Data`] if the dataset is missing or invalid.
    pub fn statistics(&mut self) -> std::result::Result<DatasetStatistics, AgentError> {
        self.load()?;
        Ok(self.loader.statistics()?)
    }

    /// Runs load → format → build index. Does nothing once ready.
    ///
    /// # Errors
    ///
    /// Returns data errors from loading and external-service errors from
    /// building the index. A failed call leaves the agent at its last
    /// completed stage, so it can be retried.
    pub async fn initialize(&mut self) -> std::result::Result<(), AgentError> {
        if self.is_ready() {
            debug!("agent already initialized");
            return Ok(());
        }

        self.load()?;
        let documents = self.loader.documents()?;

        let report = self.orchestrator.build_index(&documents).await?;
        self.advance(Lifecycle::Indexed);
        info!(
            documents = report.documents,
            dimensions = report.dimensions,
            source = ?report.source,
            "review index ready"
        );

        self.advance(Lifecycle::Ready);
        Ok(())
    }

    /// Answers a question about the reviews.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotInitialized`] before [`ReviewAgent::initialize`]
    /// has succeeded, without contacting any service; otherwise the errors of
    /// [`AnswerOrchestrator::answer`].
    pub async fn query(&self, question: &str) -> std::result::Result<QueryResult, AgentError> {
        if !self.is_ready() {
            return Err(AgentError::NotInitialized);
        }
        self.orchestrator.answer(question).await
    }

    /// Reads questions line by line from `input` and writes answers to `output`.
    ///
    /// Blank lines are skipped. The loop ends on an exit command, at end of
    /// input, or when `shutdown` completes, including while a question is
    /// being answered. A failed question is reported and the loop continues.
    /// Each question is answered independently.
    ///
    /// Returns the number of questions answered.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if reading input or writing output fails.
    pub async fn interactive_loop<R, W, S>(
        &self,
        input: R,
        output: &mut W,
        shutdown: S,
    ) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        S: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut lines = input.lines();
        let mut answered = 0;

        write_banner(output)?;

        loop {
            write!(output, "\nYour question: ")?;
            output.flush()?;

            let line = tokio::select! {
                () = &mut shutdown => {
                    writeln!(output)?;
                    break;
                }
                line = lines.next_line() => line?,
            };
            let Some(line) = line else {
                writeln!(output)?;
                break;
            };

            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if is_exit_command(question) {
                break;
            }

            writeln!(output, "\nSearching reviews...\n")?;
            output.flush()?;

            let outcome = tokio::select! {
                () = &mut shutdown => None,
                result = self.query(question) => Some(result),
            };
            match outcome {
                None => {
                    writeln!(output, "\nInterrupted.")?;
                    break;
                }
                Some(Ok(result)) => {
                    answered += 1;
                    writeln!(output, "{}", result.render_text(false))?;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "question failed");
                    writeln!(output, "Error: {e}")?;
                    if e.is_external() {
                        writeln!(output, "The service call failed; try the question again.")?;
                    }
                }
            }
        }

        writeln!(output, "Thank you for using the pizza review agent!")?;
        output.flush()?;
        Ok(answered)
    }

    fn advance(&mut self, to: Lifecycle) {
        if to > self.lifecycle {
            debug!(from = ?self.lifecycle, to = ?to, "lifecycle");
            self.lifecycle = to;
        }
    }
}

/// Whether `input` ends the interactive loop.
#[must_use]
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim();
    EXIT_COMMANDS.iter().any(|c| c.eq_ignore_ascii_case(input))
}

fn write_banner<W: Write>(output: &mut W) -> std::io::Result<()> {
    writeln!(output, "Pizza review agent")?;
    writeln!(output, "Ask questions about customer pizza reviews.")?;
    writeln!(output, "Type 'quit', 'exit', or 'q' to leave.\n")?;
    writeln!(output, "Example questions:")?;
    for question in EXAMPLE_QUESTIONS {
        writeln!(output, "  - {question}")?;
    }
    Ok(())
}
