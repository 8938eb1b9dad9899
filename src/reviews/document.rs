//! Conversion of review records into retrievable documents.
//!
//! A [`Document`] is the unit the index embeds and the orchestrator cites.
//! Its text is a one-paragraph narrative of the review; its metadata keeps
//! every record field as a string so the original record can be rebuilt.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::{ReviewRecord, parse_rating, parse_review_id};
use crate::error::DataError;

/// Metadata key for the review identifier.
pub const KEY_REVIEW_ID: &str = "review_id";
/// Metadata key for the customer name.
pub const KEY_CUSTOMER_NAME: &str = "customer_name";
/// Metadata key for the pizza type.
pub const KEY_PIZZA_TYPE: &str = "pizza_type";
/// Metadata key for the rating.
pub const KEY_RATING: &str = "rating";
/// Metadata key for the location.
pub const KEY_LOCATION: &str = "location";
/// Metadata key for the review date.
pub const KEY_DATE: &str = "date";
/// Metadata key for the review text.
pub const KEY_REVIEW_TEXT: &str = "review_text";

/// A retrievable text unit derived from exactly one [`ReviewRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier (the review id).
    pub id: String,
    /// Narrative text that gets embedded and shown to the model.
    pub text: String,
    /// Every record field, stringified.
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Returns a metadata value by key.
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Rebuilds the review record this document was formatted from.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Malformed`] if a key is missing, or the usual
    /// field errors if the id or rating do not parse.
    pub fn to_record(&self) -> Result<ReviewRecord, DataError> {
        let field = |key: &str| -> Result<String, DataError> {
            self.metadata_value(key)
                .map(ToString::to_string)
                .ok_or_else(|| DataError::Malformed {
                    line: 0,
                    message: format!("document {} has no {key} metadata", self.id),
                })
        };

        Ok(ReviewRecord {
            id: parse_review_id(&field(KEY_REVIEW_ID)?, 0)?,
            customer_name: field(KEY_CUSTOMER_NAME)?,
            pizza_type: field(KEY_PIZZA_TYPE)?,
            rating: parse_rating(&field(KEY_RATING)?, 0)?,
            location: field(KEY_LOCATION)?,
            date: field(KEY_DATE)?,
            review_text: field(KEY_REVIEW_TEXT)?,
        })
    }
}

impl From<&ReviewRecord> for Document {
    fn from(record: &ReviewRecord) -> Self {
        format(record)
    }
}

/// Formats a review record into a [`Document`].
///
/// Deterministic: the same record always yields the same text and metadata.
#[must_use]
pub fn format(record: &ReviewRecord) -> Document {
    let text = format!(
        "Review #{}: Customer {} ordered {} pizza in {} on {}. Rating: {}/5 stars. Review: {}",
        record.id,
        record.customer_name,
        record.pizza_type,
        record.location,
        record.date,
        record.rating,
        record.review_text,
    );

    let metadata = BTreeMap::from([
        (KEY_REVIEW_ID.to_string(), record.id.to_string()),
        (KEY_CUSTOMER_NAME.to_string(), record.customer_name.clone()),
        (KEY_PIZZA_TYPE.to_string(), record.pizza_type.clone()),
        (KEY_RATING.to_string(), record.rating.to_string()),
        (KEY_LOCATION.to_string(), record.location.clone()),
        (KEY_DATE.to_string(), record.date.clone()),
        (KEY_REVIEW_TEXT.to_string(), record.review_text.clone()),
    ]);

    Document {
        id: record.id.to_string(),
        text,
        metadata,
    }
}

/// Formats every record, preserving order.
#[must_use]
pub fn format_all(records: &[ReviewRecord]) -> Vec<Document> {
    records.iter().map(format).collect()
}
