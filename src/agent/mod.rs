//! Retrieval-augmented question answering over pizza reviews.
//!
//! # Architecture
//!
//! ```text
//! ReviewAgent::initialize
//!   ReviewLoader (CSV) → format → ReviewIndex::build (embed + store)
//!
//! ReviewAgent::query(question) → AnswerOrchestrator
//!   ├── ReviewIndex::search (top-k by cosine similarity)
//!   ├── build_answer_prompt (reviews + question)
//!   ├── LlmProvider::chat
//!   └── QueryResult { answer, source_reviews, usage }
//! ```
//!
//! Generation and embedding go through the [`LlmProvider`] and
//! [`crate::index::EmbeddingProvider`] traits, backed by OpenAI-compatible
//! APIs.

pub mod client;
pub mod config;
pub mod message;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod result;
pub mod review_agent;

pub use client::{Providers, create_providers};
pub use config::AgentConfig;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use orchestrator::{AnswerOrchestrator, MAX_QUESTION_LEN};
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use result::QueryResult;
pub use review_agent::{EXIT_COMMANDS, Lifecycle, ReviewAgent, is_exit_command};
