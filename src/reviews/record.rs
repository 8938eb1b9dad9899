//! The review record type and its field validation.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// One customer review, as loaded from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review identifier (`review_id` column).
    pub id: u64,
    /// Name of the reviewing customer.
    pub customer_name: String,
    /// Pizza variety that was ordered.
    pub pizza_type: String,
    /// Star rating from 1 to 5.
    pub rating: u8,
    /// City the order was placed in.
    pub location: String,
    /// Review date as written in the dataset.
    pub date: String,
    /// Free-form review text.
    pub review_text: String,
}

/// Parses and range-checks a rating cell.
///
/// `line` is only used for error reporting.
pub fn parse_rating(raw: &str, line: u64) -> Result<u8, DataError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or_else(|| DataError::InvalidRating {
            line,
            value: raw.to_string(),
        })
}

/// Parses a `review_id` cell.
pub fn parse_review_id(raw: &str, line: u64) -> Result<u64, DataError> {
    raw.trim().parse::<u64>().map_err(|_| DataError::Malformed {
        line,
        message: format!("review_id {raw:?} is not a non-negative integer"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1", 1 ; "lowest")]
    #[test_case("5", 5 ; "highest")]
    #[test_case(" 3 ", 3 ; "padded")]
    fn test_parse_rating_accepts(raw: &str, expected: u8) {
        assert_eq!(parse_rating(raw, 2).ok(), Some(expected));
    }

    #[test_case("0" ; "below range")]
    #[test_case("6" ; "above range")]
    #[test_case("-1" ; "negative")]
    #[test_case("4.5" ; "fractional")]
    #[test_case("great" ; "not a number")]
    #[test_case("" ; "empty")]
    fn test_parse_rating_rejects(raw: &str) {
        let result = parse_rating(raw, 7);
        assert!(matches!(
            result,
            Err(DataError::InvalidRating { line: 7, ref value }) if value == raw
        ));
    }

    #[test]
    fn test_parse_review_id() {
        assert_eq!(parse_review_id("42", 1).ok(), Some(42));
        assert!(matches!(
            parse_review_id("abc", 3),
            Err(DataError::Malformed { line: 3, .. })
        ));
    }
}
