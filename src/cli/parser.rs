//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

use crate::reviews::DEFAULT_DATA_PATH;

/// Ask questions about customer pizza reviews.
///
/// Answers are generated from the reviews most similar to the question.
/// Without a question, starts an interactive session.
#[derive(Parser, Debug)]
#[command(name = "pizza-review-agent")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"Examples:
  pizza-review-agent "What do customers think about the Margherita?"
  pizza-review-agent Which pizza has the best reviews --sources
  pizza-review-agent --format json "Any complaints about delivery?" | jq .answer
  pizza-review-agent --stats               # Dataset overview, no API key needed
  pizza-review-agent                       # Interactive session
"#)]
pub struct Cli {
    /// Question to answer. Words are joined with spaces.
    ///
    /// Omit to start an interactive session.
    #[arg(value_name = "QUESTION")]
    pub question: Vec<String>,

    /// Path to the review CSV file.
    #[arg(long, env = "PIZZA_REVIEWS_PATH", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Directory for the persisted index.
    ///
    /// Defaults to `.pizza-review-agent/index` in the current directory.
    #[arg(long, env = "PIZZA_INDEX_DIR")]
    pub index_dir: Option<PathBuf>,

    /// Build the index in memory only; never read or write the index directory.
    #[arg(long)]
    pub no_persist: bool,

    /// Number of reviews retrieved per question.
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Embedding model (overrides `EMBEDDING_MODEL`).
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Generation model (overrides `LLM_MODEL`).
    #[arg(long)]
    pub generation_model: Option<String>,

    /// Directory containing prompt template overrides.
    #[arg(long)]
    pub prompt_dir: Option<PathBuf>,

    /// Print the retrieved reviews with their similarity scores.
    #[arg(long)]
    pub sources: bool,

    /// Print dataset statistics and sample reviews, then exit.
    #[arg(long, conflicts_with = "question")]
    pub stats: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The question, if one was given on the command line.
    #[must_use]
    pub fn question(&self) -> Option<String> {
        let question = self.question.join(" ");
        let question = question.trim();
        (!question.is_empty()).then(|| question.to_string())
    }
}
