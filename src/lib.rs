//! # pizza-review-agent
//!
//! Answers natural-language questions about customer pizza reviews using
//! retrieval-augmented generation.
//!
//! Reviews are loaded from a CSV file, formatted into one text document
//! each, embedded, and stored in a vector index. A question is embedded the
//! same way; the most similar reviews are handed to a chat model together
//! with the question, and the answer comes back with its sources.
//!
//! ## Example
//!
//! ```no_run
//! use pizza_review_agent::agent::{AgentConfig, ReviewAgent};
//! use pizza_review_agent::reviews::ReviewLoader;
//!
//! # async fn run() -> pizza_review_agent::Result<()> {
//! let config = AgentConfig::from_env()?;
//! let mut agent = ReviewAgent::from_config(&config, ReviewLoader::new("data/pizza_reviews.csv"))?;
//! agent.initialize().await?;
//!
//! let result = agent.query("Which pizza has the best reviews?").await?;
//! assert!(result.source_reviews.len() <= config.top_k);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod error;
pub mod index;
pub mod reviews;

pub use agent::{AgentConfig, QueryResult, ReviewAgent};
pub use error::{AgentError, CommandError, DataError, Error, Result};
pub use index::{ReviewIndex, ScoredDocument};
pub use reviews::{DatasetStatistics, Document, ReviewLoader, ReviewRecord};
