//! Error types for the pizza review agent.
//!
//! Errors are grouped by the layer that raises them: [`DataError`] for the
//! review dataset, [`AgentError`] for indexing, retrieval and generation, and
//! [`CommandError`] for the CLI. The top-level [`Error`] wraps all of them.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias using the crate-wide [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The review dataset is missing or invalid.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Indexing, retrieval, or generation failed.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// A CLI command failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// An I/O error outside the dataset and index.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The review dataset is unavailable: missing file, bad schema, or bad rows.
#[derive(Debug, Error)]
pub enum DataError {
    /// The dataset file does not exist.
    #[error("dataset not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The dataset file exists but could not be read.
    #[error("failed to read dataset {}: {message}", path.display())]
    Io {
        /// Path of the dataset.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// Required columns are absent from the header row.
    #[error("dataset is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// The missing columns, in canonical column order.
        columns: Vec<String>,
    },

    /// A rating is not an integer between 1 and 5.
    #[error("invalid rating {value:?} on line {line}: expected an integer from 1 to 5")]
    InvalidRating {
        /// 1-based line number in the source file.
        line: u64,
        /// The offending cell value.
        value: String,
    },

    /// A review has no text.
    #[error("empty review_text on line {line}")]
    EmptyReview {
        /// 1-based line number in the source file.
        line: u64,
    },

    /// Two rows share a `review_id`.
    #[error("duplicate review_id {id} on line {line} (first seen on line {first_line})")]
    DuplicateId {
        /// The repeated identifier.
        id: u64,
        /// 1-based line number of the repeat.
        line: u64,
        /// 1-based line number where the id first appeared.
        first_line: u64,
    },

    /// A row could not be parsed.
    #[error("malformed row on line {line}: {message}")]
    Malformed {
        /// 1-based line number in the source file (0 if unknown).
        line: u64,
        /// Parser message.
        message: String,
    },

    /// The dataset contains no review rows.
    #[error("dataset contains no reviews")]
    NoRecords,
}

/// Errors raised while indexing, retrieving, or generating answers.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API credential was configured.
    #[error("OPENAI_API_KEY not set")]
    ApiKeyMissing,

    /// A configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },

    /// The configured provider name is not recognized.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Provider name from configuration.
        name: String,
    },

    /// An operation was invoked before the agent was initialized.
    #[error("agent not initialized: call initialize() before querying")]
    NotInitialized,

    /// The answer pipeline was used before its index was built.
    #[error("retrieval index not ready: build the index before answering")]
    NotReady,

    /// The question was empty.
    #[error("question cannot be empty")]
    EmptyQuestion,

    /// The question exceeds the accepted length.
    #[error("question exceeds maximum length ({len} bytes, max {max})")]
    QuestionTooLong {
        /// Length of the question in bytes.
        len: usize,
        /// Maximum accepted length in bytes.
        max: usize,
    },

    /// The generation service request failed.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Error message from the client.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// The embedding service request failed or returned unusable data.
    #[error("embedding failed ({provider}): {message}")]
    Embedding {
        /// Embedding provider name.
        provider: String,
        /// Error message.
        message: String,
    },

    /// The vector store rejected an operation.
    #[error("vector store error ({backend}): {message}")]
    VectorStore {
        /// Store backend name.
        backend: String,
        /// Error message.
        message: String,
    },

    /// Reading or writing the persisted index failed.
    #[error("index persistence failed at {}: {message}", path.display())]
    Index {
        /// Index file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The dataset could not be loaded.
    #[error(transparent)]
    Data(#[from] DataError),
}

impl AgentError {
    /// Returns `true` for failures of an external service call.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest { .. } | Self::Embedding { .. } | Self::VectorStore { .. }
        )
    }
}

/// CLI command failures.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command could not complete.
    #[error("{0}")]
    ExecutionFailed(String),

    /// Output could not be rendered.
    #[error("output formatting failed: {0}")]
    OutputFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_columns() {
        let err = DataError::MissingColumns {
            columns: vec!["rating".to_string(), "location".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "dataset is missing required columns: rating, location"
        );
    }

    #[test]
    fn test_data_error_wraps_transparently() {
        let err: Error = AgentError::Data(DataError::NoRecords).into();
        assert_eq!(err.to_string(), "dataset contains no reviews");
    }

    #[test]
    fn test_is_external() {
        assert!(
            AgentError::ApiRequest {
                message: "timeout".to_string(),
                status: None,
            }
            .is_external()
        );
        assert!(!AgentError::NotInitialized.is_external());
        assert!(!AgentError::ApiKeyMissing.is_external());
    }
}
