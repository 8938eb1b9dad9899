//! System prompt and the user-message template for answer generation.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::index::ScoredDocument;

/// System prompt for the answering model.
pub const ANSWER_SYSTEM_PROMPT: &str = r"You answer questions about customer pizza reviews.

You are given a set of reviews retrieved for the user's question. Each review lists the customer, the pizza they ordered, the city, the date, a 1-5 star rating, and the review text.

## Rules

- Base your answer only on the reviews provided. Do not invent reviews, customers, ratings, or locations.
- If the reviews do not contain the answer, say that you don't know rather than guessing.
- When you summarize sentiment or compare pizzas, mention the ratings and cities that support the claim.
- Quote short phrases from reviews when they make the point clearer.
- Keep the answer concise: a short paragraph or a few bullet points.";

/// Filename for the answer prompt template.
const ANSWER_FILENAME: &str = "answer.md";

/// Default prompt directory, relative to the user's home.
const DEFAULT_PROMPT_DIR: &str = ".config/pizza-review-agent/prompts";

/// Prompts used by the answer pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// System prompt for answer generation.
    pub answer: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for the directory:
    /// 1. Explicit `prompt_dir` argument
    /// 2. `~/.config/pizza-review-agent/prompts/`
    ///
    /// A missing or empty file uses the default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir.map(Path::to_path_buf).or_else(Self::default_dir);

        let answer = resolved_dir
            .map(|dir| dir.join(ANSWER_FILENAME))
            .and_then(|path| std::fs::read_to_string(path).ok())
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| ANSWER_SYSTEM_PROMPT.to_string());

        Self { answer }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            answer: ANSWER_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}

/// Builds the user message: retrieved reviews followed by the question.
#[must_use]
pub fn build_answer_prompt(question: &str, sources: &[ScoredDocument]) -> String {
    let mut prompt = String::new();

    if sources.is_empty() {
        prompt.push_str("No reviews were retrieved for this question.\n");
    } else {
        let _ = writeln!(prompt, "## Reviews ({})\n", sources.len());
        for source in sources {
            let _ = writeln!(prompt, "{}\n", source.document.text);
        }
    }

    let _ = write!(prompt, "## Question\n\n{question}");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::ReviewRecord;
    use crate::reviews::document::format;
    use tempfile::TempDir;

    fn source(id: u64, text: &str) -> ScoredDocument {
        ScoredDocument {
            document: format(&ReviewRecord {
                id,
                customer_name: "Ann".to_string(),
                pizza_type: "Margherita".to_string(),
                rating: 5,
                location: "NYC".to_string(),
                date: "2024-01-01".to_string(),
                review_text: text.to_string(),
            }),
            score: 0.9,
        }
    }

    #[test]
    fn test_build_answer_prompt() {
        let prompt = build_answer_prompt(
            "What do people think of Margherita?",
            &[source(1, "Loved it"), source(2, "Soggy crust")],
        );
        assert!(prompt.contains("## Reviews (2)"));
        assert!(prompt.contains("Review #1:"));
        assert!(prompt.contains("Soggy crust"));
        assert!(prompt.ends_with("What do people think of Margherita?"));
        assert!(prompt.find("Review #1").unwrap_or(usize::MAX) < prompt.find("Review #2").unwrap_or(0));
    }

    #[test]
    fn test_build_answer_prompt_without_sources() {
        let prompt = build_answer_prompt("Anything?", &[]);
        assert!(prompt.starts_with("No reviews were retrieved"));
    }

    #[test]
    fn test_load_override_and_fallback() {
        let dir = TempDir::new().unwrap_or_else(|_| unreachable!());
        assert_eq!(PromptSet::load(Some(dir.path())), PromptSet::defaults());

        std::fs::write(dir.path().join(ANSWER_FILENAME), "Answer like a pizzaiolo.")
            .unwrap_or_else(|_| unreachable!());
        let prompts = PromptSet::load(Some(dir.path()));
        assert_eq!(prompts.answer, "Answer like a pizzaiolo.");
    }

    #[test]
    fn test_prompts_not_empty() {
        assert!(!ANSWER_SYSTEM_PROMPT.is_empty());
    }
}
