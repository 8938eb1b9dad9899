//! `OpenAI` provider implementation using the `async-openai` crate.
//!
//! One client serves both chat completions (answer generation) and the
//! embeddings endpoint. Supports any `OpenAI`-compatible API (`OpenAI`,
//! Azure, local proxies) via the base URL override in [`AgentConfig`].

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    CreateEmbeddingRequestArgs, EmbeddingInput,
};
use async_trait::async_trait;
use tracing::debug;

use crate::agent::config::AgentConfig;
use crate::agent::message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
use crate::agent::provider::LlmProvider;
use crate::error::AgentError;
use crate::index::EmbeddingProvider;

/// `OpenAI`-compatible generation and embedding provider.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    embedding_model: String,
}

impl OpenAiProvider {
    /// Creates a new provider from agent configuration.
    #[must_use]
    pub fn new(config: &AgentConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(ref base_url) = config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(openai_config),
            embedding_model: config.embedding_model.clone(),
        }
    }

    /// Converts our message type to the `OpenAI` SDK type.
    fn convert_message(msg: &ChatMessage) -> ChatCompletionRequestMessage {
        match msg.role {
            Role::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            Role::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                name: None,
            }),
        }
    }

    /// Builds an `OpenAI` chat completion request from our generic request.
    fn build_request(request: &ChatRequest) -> CreateChatCompletionRequest {
        let messages: Vec<_> = request.messages.iter().map(Self::convert_message).collect();

        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_completion_tokens: request.max_tokens,
            ..Default::default()
        }
    }

    fn embedding_error(&self, message: impl Into<String>) -> AgentError {
        AgentError::Embedding {
            provider: LlmProvider::name(self).to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<async-openai::Client>")
            .field("embedding_model", &self.embedding_model)
            .finish()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        let openai_request = Self::build_request(request);

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| AgentError::ApiRequest {
                message: e.to_string(),
                status: None,
            })?;

        let choice = response.choices.first();

        let content = choice
            .and_then(|c| c.message.content.as_ref())
            .cloned()
            .unwrap_or_default();

        let finish_reason = choice.and_then(|c| {
            c.finish_reason
                .as_ref()
                .map(|fr| format!("{fr:?}").to_lowercase())
        });

        let usage = response
            .usage
            .map_or_else(TokenUsage::default, |u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            });

        Ok(ChatResponse {
            content,
            usage,
            finish_reason,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.embedding_model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AgentError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.embedding_model)
            .input(EmbeddingInput::StringArray(texts.to_vec()))
            .build()
            .map_err(|e| self.embedding_error(e.to_string()))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| self.embedding_error(e.to_string()))?;

        debug!(
            inputs = texts.len(),
            prompt_tokens = response.usage.prompt_tokens,
            "embeddings received"
        );

        let mut data = response.data;
        if data.len() != texts.len() {
            return Err(self.embedding_error(format!(
                "expected {} embeddings, received {}",
                texts.len(),
                data.len()
            )));
        }
        data.sort_by_key(|e| e.index);
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message;

    fn config() -> AgentConfig {
        AgentConfig::builder()
            .api_key("test")
            .embedding_model("text-embedding-3-large")
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn test_convert_system_message() {
        let msg = message::system_message("test");
        let converted = OpenAiProvider::convert_message(&msg);
        assert!(matches!(converted, ChatCompletionRequestMessage::System(_)));
    }

    #[test]
    fn test_convert_user_message() {
        let msg = message::user_message("hello");
        let converted = OpenAiProvider::convert_message(&msg);
        assert!(matches!(converted, ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_build_request_keeps_zero_temperature() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                message::system_message("system"),
                message::user_message("question"),
            ],
            temperature: Some(0.0),
            max_tokens: Some(100),
        };
        let built = OpenAiProvider::build_request(&request);
        assert_eq!(built.model, "gpt-4o-mini");
        assert_eq!(built.messages.len(), 2);
        assert_eq!(built.temperature, Some(0.0));
        assert_eq!(built.max_completion_tokens, Some(100));
        assert!(built.tools.is_none());
    }

    #[test]
    fn test_embedding_model_from_config() {
        let provider = OpenAiProvider::new(&config());
        assert_eq!(EmbeddingProvider::model(&provider), "text-embedding-3-large");
        assert_eq!(EmbeddingProvider::name(&provider), "openai");
    }

    #[tokio::test]
    async fn test_embed_empty_input_makes_no_request() {
        let provider = OpenAiProvider::new(&config());
        let result = provider.embed(&[]).await;
        assert!(matches!(result, Ok(ref v) if v.is_empty()));
    }
}
