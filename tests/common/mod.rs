//! Test doubles for the embedding and generation services.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pizza_review_agent::AgentError;
use pizza_review_agent::agent::{AgentConfig, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use pizza_review_agent::index::EmbeddingProvider;
use tempfile::TempDir;

pub const HEADER: &str = "review_id,customer_name,pizza_type,rating,review_text,date,location";

const KEYWORDS: [&str; 6] = ["margherita", "pepperoni", "crust", "delivery", "cheese", "salty"];

/// Embeds text as keyword counts plus a bias term.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn model(&self) -> &str {
        "keyword-v1"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                let mut v: Vec<f32> = KEYWORDS
                    .iter()
                    .map(|k| f32::from(u8::try_from(lower.matches(k).count()).unwrap_or(u8::MAX)))
                    .collect();
                v.push(0.1);
                v
            })
            .collect())
    }
}

/// Replies with a canned answer, or fails when the question contains `fail_on`.
pub struct ScriptedGenerator {
    pub calls: AtomicUsize,
    pub fail_on: Option<String>,
    pub last_prompt: Mutex<Option<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: None,
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl LlmProvider for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.clone());
        }
        if let Some(marker) = &self.fail_on {
            if prompt.contains(marker.as_str()) {
                return Err(AgentError::ApiRequest {
                    message: "service unavailable".to_string(),
                    status: Some(503),
                });
            }
        }
        Ok(ChatResponse {
            content: "Customers love the Margherita.".to_string(),
            usage: TokenUsage {
                prompt_tokens: 50,
                completion_tokens: 6,
                total_tokens: 56,
            },
            finish_reason: Some("stop".to_string()),
        })
    }
}

/// Writes a review CSV with the standard header into `dir`.
pub fn write_reviews(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("reviews.csv");
    let mut file = std::fs::File::create(&path).unwrap_or_else(|_| unreachable!());
    writeln!(file, "{HEADER}").unwrap_or_else(|_| unreachable!());
    for row in rows {
        writeln!(file, "{row}").unwrap_or_else(|_| unreachable!());
    }
    path
}

/// A small dataset covering several pizzas and cities.
pub const SAMPLE_ROWS: [&str; 4] = [
    "1,Ann,Margherita,5,Loved it. Perfect margherita with fresh basil.,2024-01-01,NYC",
    "2,Bob,Pepperoni,2,Pepperoni was salty and the crust was soggy.,2024-01-02,Chicago",
    "3,Cy,Hawaiian,4,\"Sweet, tangy and good cheese.\",2024-01-03,Boston",
    "4,Di,Margherita,3,Delivery was late but the margherita was fine.,2024-01-04,NYC",
];

pub fn config(index_dir: Option<PathBuf>, top_k: usize) -> AgentConfig {
    let mut builder = AgentConfig::builder()
        .api_key("test-key")
        .generation_model("test-model")
        .top_k(top_k);
    builder = match index_dir {
        Some(dir) => builder.index_dir(dir),
        None => builder.persist(false),
    };
    builder.build().unwrap_or_else(|_| unreachable!())
}

pub fn providers() -> (Arc<KeywordEmbedder>, Arc<ScriptedGenerator>) {
    (Arc::new(KeywordEmbedder::default()), Arc::new(ScriptedGenerator::new()))
}
