//! CSV loading and validation of the review dataset.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use super::document::{self, Document};
use super::record::{ReviewRecord, parse_rating, parse_review_id};
use super::stats::DatasetStatistics;
use crate::error::DataError;

/// Columns every dataset must provide, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "review_id",
    "customer_name",
    "pizza_type",
    "rating",
    "review_text",
    "date",
    "location",
];

/// Default dataset location, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/pizza_reviews.csv";

/// A row as it appears in the file, before validation.
#[derive(Debug, Deserialize)]
struct RawReview {
    review_id: String,
    customer_name: String,
    pizza_type: String,
    rating: String,
    review_text: String,
    date: String,
    location: String,
}

/// Loads review records from a CSV file and caches them.
///
/// The file is read on the first call to [`ReviewLoader::load`] (or any
/// method that needs the rows); later calls reuse the cached records.
#[derive(Debug, Clone)]
pub struct ReviewLoader {
    path: PathBuf,
    records: Option<Vec<ReviewRecord>>,
}

impl ReviewLoader {
    /// Creates a loader for the given CSV path. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: None,
        }
    }

    /// Creates a loader that is already populated with `records`.
    #[must_use]
    pub fn from_records(records: Vec<ReviewRecord>) -> Self {
        Self {
            path: PathBuf::new(),
            records: Some(records),
        }
    }

    /// Path of the dataset.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the records have been read.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.records.is_some()
    }

    /// Returns the records, reading the file on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] if the file is missing or invalid.
    pub fn load(&mut self) -> Result<&[ReviewRecord], DataError> {
        let records = match self.records.take() {
            Some(records) => records,
            None => {
                let records = read_reviews(&self.path)?;
                info!(
                    path = %self.path.display(),
                    count = records.len(),
                    "loaded reviews"
                );
                records
            }
        };
        Ok(self.records.insert(records).as_slice())
    }

    /// Computes dataset statistics, loading the records if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] if the records cannot be loaded.
    pub fn statistics(&mut self) -> Result<DatasetStatistics, DataError> {
        Ok(DatasetStatistics::from_records(self.load()?))
    }

    /// Formats every record into a [`Document`], loading the records if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DataError`] if the records cannot be loaded.
    pub fn documents(&mut self) -> Result<Vec<Document>, DataError> {
        Ok(document::format_all(self.load()?))
    }
}

/// Reads and validates a review CSV file.
///
/// # Errors
///
/// Returns [`DataError::NotFound`] if the file does not exist, and the
/// errors of [`parse_reviews`] for invalid content.
pub fn read_reviews(path: &Path) -> Result<Vec<ReviewRecord>, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_reviews(BufReader::new(file))
}

/// Parses and validates review CSV data from any reader.
///
/// The header row must contain every column in [`REQUIRED_COLUMNS`]; extra
/// columns are ignored and cells are trimmed.
///
/// # Errors
///
/// - [`DataError::MissingColumns`] listing exactly the absent columns
/// - [`DataError::InvalidRating`] for a rating outside 1–5
/// - [`DataError::EmptyReview`] for a blank `review_text`
/// - [`DataError::DuplicateId`] when a `review_id` repeats
/// - [`DataError::Malformed`] for rows the CSV parser rejects
/// - [`DataError::NoRecords`] if there are no data rows
pub fn parse_reviews<R: Read>(reader: R) -> Result<Vec<ReviewRecord>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| (*column).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns { columns: missing });
    }

    let mut records = Vec::new();
    let mut seen: HashMap<u64, u64> = HashMap::new();
    for row in csv_reader.records() {
        let row = row.map_err(csv_error)?;
        let line = row.position().map_or(0, csv::Position::line);
        let raw: RawReview = row.deserialize(Some(&headers)).map_err(|e| DataError::Malformed {
            line,
            message: e.to_string(),
        })?;
        let record = validate(raw, line)?;
        if let Some(&first_line) = seen.get(&record.id) {
            return Err(DataError::DuplicateId {
                id: record.id,
                line,
                first_line,
            });
        }
        seen.insert(record.id, line);
        records.push(record);
    }

    if records.is_empty() {
        return Err(DataError::NoRecords);
    }
    debug!(count = records.len(), "parsed review rows");
    Ok(records)
}

fn validate(raw: RawReview, line: u64) -> Result<ReviewRecord, DataError> {
    let id = parse_review_id(&raw.review_id, line)?;
    let rating = parse_rating(&raw.rating, line)?;
    if raw.review_text.trim().is_empty() {
        return Err(DataError::EmptyReview { line });
    }

    Ok(ReviewRecord {
        id,
        customer_name: raw.customer_name,
        pizza_type: raw.pizza_type,
        rating,
        location: raw.location,
        date: raw.date,
        review_text: raw.review_text,
    })
}

fn csv_error(err: csv::Error) -> DataError {
    DataError::Malformed {
        line: err.position().map_or(0, csv::Position::line),
        message: err.to_string(),
    }
}
