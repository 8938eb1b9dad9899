//! Review dataset: records, loading, statistics, and document formatting.

pub mod document;
pub mod loader;
pub mod record;
pub mod stats;

pub use document::Document;
pub use loader::{DEFAULT_DATA_PATH, REQUIRED_COLUMNS, ReviewLoader, parse_reviews, read_reviews};
pub use record::ReviewRecord;
pub use stats::DatasetStatistics;
