use super::LlmBackend;
use crate::config::{LlmProvider, ModelConfig};
use crate::llm::CompletionRequest;
use crate::stream::{CompletionStream, StreamEvent};
use adda_core::{AddaError, AddaResult};
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use std::fmt::Display;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// OpenAI-compatible API backend.
///
/// Works with Groq, OpenAI, OpenRouter and any other provider that
/// implements the OpenAI chat completions API with server-sent events.
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    /// Creates a backend with its own HTTP client.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream");

        // OpenRouter requires extra headers
        if matches!(self.config.provider, LlmProvider::OpenRouter) {
            request.header("X-Title", "Adda")
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn stream_completion(&self, request: &CompletionRequest) -> AddaResult<CompletionStream> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        info!(
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = request.max_tokens,
            "Requesting streaming completion"
        );

        let resp = self
            .add_provider_headers(self.http.post(&url))
            .json(request)
            .send()
            .await
            .map_err(|e| AddaError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AddaError::Provider(format!(
                "API error {status}: {error_body}"
            )));
        }

        let (tx, stream) = CompletionStream::channel();
        tokio::spawn(pump_events(resp.bytes_stream(), tx));
        Ok(stream)
    }
}

/// Reads server-sent events off `body` and forwards them as [`StreamEvent`]s.
///
/// Stops after the first terminal event, or when the consumer goes away.
pub async fn pump_events<S, B, E>(body: S, tx: mpsc::Sender<StreamEvent>)
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut body = std::pin::pin!(body);
    let mut decoder = SseDecoder::default();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Stream read error");
                let _ = tx
                    .send(StreamEvent::Error {
                        message: format!("Stream read error: {e}"),
                    })
                    .await;
                return;
            }
        };

        for line in decoder.push(chunk.as_ref()) {
            if !forward(&line, &tx).await {
                return;
            }
        }
    }

    if let Some(line) = decoder.finish() {
        if !forward(&line, &tx).await {
            return;
        }
    }
    let _ = tx.send(StreamEvent::Done).await;
}

/// Sends the event for one SSE line. Returns `false` once nothing more may be sent.
async fn forward(line: &str, tx: &mpsc::Sender<StreamEvent>) -> bool {
    match parse_sse_line(line) {
        SseLine::Skip => true,
        SseLine::Fragment(text) => tx.send(StreamEvent::TextDelta { text }).await.is_ok(),
        SseLine::Done => {
            let _ = tx.send(StreamEvent::Done).await;
            false
        }
        SseLine::Error(message) => {
            warn!(error = %message, "Provider reported an error mid-stream");
            let _ = tx.send(StreamEvent::Error { message }).await;
            false
        }
    }
}

/// What a single SSE line means for the completion.
#[derive(Debug, PartialEq, Eq)]
pub enum SseLine {
    /// Comment, keep-alive, unparsable data, or a chunk without content.
    Skip,
    /// Non-empty `delta.content` text.
    Fragment(String),
    /// `data: [DONE]`.
    Done,
    /// A provider `error` object; ends the stream.
    Error(String),
}

/// Classifies one line of the event stream.
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return SseLine::Skip;
    }

    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let data = data.trim_start();
    if data == "[DONE]" {
        return SseLine::Done;
    }

    let event: serde_json::Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "Skipping unparsable stream chunk");
            return SseLine::Skip;
        }
    };

    if let Some(err) = event.get("error").filter(|e| !e.is_null()) {
        let message = err["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return SseLine::Error(message);
    }

    match event["choices"][0]["delta"]["content"].as_str() {
        Some(content) if !content.is_empty() => SseLine::Fragment(content.to_string()),
        _ => SseLine::Skip,
    }
}

/// Splits a byte stream into complete lines.
///
/// Works on bytes so a multi-byte character split across network chunks is
/// decoded only once the whole line has arrived.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feeds a chunk and returns every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line).trim_end().to_string());
        }
        lines
    }

    /// Returns the trailing line if the body did not end with a newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).trim_end().to_string())
    }
}
