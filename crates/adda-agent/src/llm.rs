use crate::backends::openai::OpenAiBackend;
use crate::backends::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use crate::stream::CompletionStream;
use adda_core::{AddaResult, Message};
use serde::Serialize;
use std::sync::Arc;

/// Per-response token cap sent with every request.
pub const MAX_TOKENS: u32 = 500;

/// Body of a streaming chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Context, transcript and the new user message, in order.
    pub messages: Vec<Message>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Always [`MAX_TOKENS`].
    pub max_tokens: u32,
    /// Always `true`.
    pub stream: bool,
}

impl CompletionRequest {
    /// A streaming request capped at [`MAX_TOKENS`].
    pub fn new(
        model: impl Into<String>,
        messages: Vec<Message>,
        temperature: f32,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            max_tokens: MAX_TOKENS,
            stream: true,
        }
    }
}

/// Completion client that dispatches to the configured provider backend.
#[derive(Clone)]
pub struct LlmClient {
    backend: Arc<dyn LlmBackend>,
}

impl LlmClient {
    /// Picks the backend for `config.provider`.
    pub fn new(config: ModelConfig) -> Self {
        let backend: Arc<dyn LlmBackend> = match config.provider {
            LlmProvider::Groq | LlmProvider::OpenAi | LlmProvider::OpenRouter => {
                Arc::new(OpenAiBackend::new(config))
            }
        };
        Self { backend }
    }

    /// Create from a pre-built backend (for custom providers and tests).
    pub fn from_backend(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }

    /// Issues one streaming request; no retry.
    pub async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> AddaResult<CompletionStream> {
        self.backend.stream_completion(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn request_body_fields() {
        let request = CompletionRequest::new(
            "llama-3.3-70b-versatile",
            vec![Message::system("Be cool."), Message::user("Hi")],
            0.8,
        );
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["stream"], true);
        assert!((body["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hi");
    }
}
