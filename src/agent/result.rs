//! The result of answering one question.

use std::fmt::Write;
use std::time::Duration;

use serde::Serialize;

use super::message::TokenUsage;
use crate::index::ScoredDocument;
use crate::reviews::document::{KEY_CUSTOMER_NAME, KEY_LOCATION, KEY_PIZZA_TYPE, KEY_RATING};

/// Width of the separator lines in text output.
const RULE_WIDTH: usize = 70;

/// Answer to a question plus the reviews it was based on.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// The question as asked (trimmed).
    pub question: String,
    /// Generated answer text.
    pub answer: String,
    /// Retrieved reviews, most similar first.
    pub source_reviews: Vec<ScoredDocument>,
    /// Generation model that produced the answer.
    pub model: String,
    /// Token usage of the generation call.
    pub usage: TokenUsage,
    /// Why the model stopped generating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Total elapsed time for retrieval and generation.
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_duration<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_f64(d.as_secs_f64())
}

impl QueryResult {
    /// Renders the answer for a terminal, optionally listing the sources.
    #[must_use]
    pub fn render_text(&self, show_sources: bool) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        let mut out = String::new();
        let _ = writeln!(out, "{heavy}");
        let _ = writeln!(out, "Answer:");
        let _ = writeln!(out, "{light}");
        let _ = writeln!(out, "{}", self.answer.trim());
        let _ = writeln!(out, "{heavy}");
        let _ = write!(
            out,
            "Based on {} relevant review{}",
            self.source_reviews.len(),
            if self.source_reviews.len() == 1 { "" } else { "s" }
        );

        if show_sources {
            for source in &self.source_reviews {
                let doc = &source.document;
                let field = |key: &str| doc.metadata_value(key).unwrap_or("?").to_string();
                let _ = write!(
                    out,
                    "\n  [{:.3}] #{} {} - {} - {} ({}/5)",
                    source.score,
                    doc.id,
                    field(KEY_CUSTOMER_NAME),
                    field(KEY_PIZZA_TYPE),
                    field(KEY_LOCATION),
                    field(KEY_RATING),
                );
            }
        }

        out
    }
}
