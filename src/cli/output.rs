//! Output formatting for CLI commands.

use std::fmt::Write;

use serde::Serialize;

use crate::agent::QueryResult;
use crate::error::{CommandError, Result};
use crate::reviews::{DatasetStatistics, Document};

/// Number of sample reviews shown with the statistics.
pub const SAMPLE_REVIEWS: usize = 3;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name. Unknown names fall back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CommandError::OutputFormat(format!("JSON serialization failed: {e}")).into())
}

/// Formats an answered question.
///
/// # Errors
///
/// Returns [`CommandError::OutputFormat`] if JSON serialization fails.
pub fn format_query_result(
    result: &QueryResult,
    show_sources: bool,
    verbose: bool,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut output = result.render_text(show_sources);
            if verbose {
                let _ = write!(
                    output,
                    "\n\n---\nModel: {} | Tokens: {} ({} prompt, {} completion) | Time: {:.1}s",
                    result.model,
                    result.usage.total_tokens,
                    result.usage.prompt_tokens,
                    result.usage.completion_tokens,
                    result.elapsed.as_secs_f64()
                );
            }
            output.push('\n');
            Ok(output)
        }
        OutputFormat::Json => to_json(result),
    }
}

#[derive(Serialize)]
struct StatisticsOutput<'a> {
    statistics: &'a DatasetStatistics,
    samples: &'a [Document],
}

/// Formats dataset statistics followed by a few sample reviews.
///
/// # Errors
///
/// Returns [`CommandError::OutputFormat`] if JSON serialization fails.
pub fn format_statistics(
    stats: &DatasetStatistics,
    samples: &[Document],
    format: OutputFormat,
) -> Result<String> {
    let samples = &samples[..samples.len().min(SAMPLE_REVIEWS)];

    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Dataset Statistics");
            let _ = writeln!(output, "==================");
            let _ = writeln!(output, "Total Reviews:  {}", stats.total_reviews);
            let _ = writeln!(output, "Average Rating: {:.2}/5", stats.average_rating_rounded());
            let _ = writeln!(output, "Pizza Types:    {}", stats.pizza_types.join(", "));
            let _ = writeln!(output, "Locations:      {}", stats.locations.join(", "));
            let _ = writeln!(output, "\nRating Distribution:");
            for (rating, count) in stats.rating_distribution.iter().rev() {
                let _ = writeln!(output, "  {rating} stars: {} ({count})", "#".repeat(*count));
            }
            if !samples.is_empty() {
                let _ = writeln!(output, "\nSample Reviews:");
                for doc in samples {
                    let _ = writeln!(output, "  {}", doc.text);
                }
            }
            Ok(output)
        }
        OutputFormat::Json => to_json(&StatisticsOutput {
            statistics: stats,
            samples,
        }),
    }
}
