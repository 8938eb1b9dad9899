//! Summary statistics over a loaded dataset.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::record::ReviewRecord;

/// Aggregate view of the review dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStatistics {
    /// Number of reviews.
    pub total_reviews: usize,
    /// Arithmetic mean of all ratings (0.0 for an empty dataset).
    pub average_rating: f64,
    /// Distinct pizza types, in first-appearance order.
    pub pizza_types: Vec<String>,
    /// Distinct locations, in first-appearance order.
    pub locations: Vec<String>,
    /// Number of reviews per rating value. Only ratings that occur are present.
    pub rating_distribution: BTreeMap<u8, usize>,
}

impl DatasetStatistics {
    /// Computes statistics for the given records.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(records: &[ReviewRecord]) -> Self {
        let mut rating_distribution = BTreeMap::new();
        let mut rating_sum: u64 = 0;
        for record in records {
            *rating_distribution.entry(record.rating).or_insert(0) += 1;
            rating_sum += u64::from(record.rating);
        }

        let average_rating = if records.is_empty() {
            0.0
        } else {
            rating_sum as f64 / records.len() as f64
        };

        Self {
            total_reviews: records.len(),
            average_rating,
            pizza_types: distinct(records.iter().map(|r| r.pizza_type.as_str())),
            locations: distinct(records.iter().map(|r| r.location.as_str())),
            rating_distribution,
        }
    }

    /// Average rating rounded to two decimals, for display.
    #[must_use]
    pub fn average_rating_rounded(&self) -> f64 {
        (self.average_rating * 100.0).round() / 100.0
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(ToString::to_string)
        .collect()
}
