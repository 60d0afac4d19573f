/// OpenAI-compatible chat completions over server-sent events.
pub mod openai;
/// Canned replies for tests and offline runs.
pub mod scripted;

use crate::llm::CompletionRequest;
use crate::stream::CompletionStream;
use adda_core::AddaResult;
use async_trait::async_trait;

/// Trait for completion provider backends.
///
/// To add a new provider:
/// 1. Create a new module in `backends/`
/// 2. Implement `LlmBackend` for your struct
/// 3. Add the variant to `LlmProvider` enum in `config.rs`
/// 4. Wire it up in `LlmClient::new()` in `llm.rs`
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Sends `request` and returns its fragments as they arrive.
    ///
    /// An `Err` means the provider could not be reached or refused the
    /// request; failures after the first byte arrive as
    /// [`StreamEvent::Error`](crate::stream::StreamEvent::Error) instead.
    async fn stream_completion(&self, request: &CompletionRequest) -> AddaResult<CompletionStream>;
}
