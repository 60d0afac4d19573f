use super::LlmBackend;
use crate::llm::CompletionRequest;
use crate::stream::{CompletionStream, StreamEvent};
use adda_core::{AddaError, AddaResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;

/// One canned provider behaviour.
#[derive(Debug, Clone)]
pub enum Script {
    /// Stream these fragments, then end normally.
    Reply(Vec<String>),
    /// Stream these fragments, then fail mid-stream.
    FailAfter { fragments: Vec<String>, error: String },
    /// Refuse the request before any stream exists (transport failure).
    Refuse(String),
}

impl Script {
    /// A normal reply made of `fragments`.
    pub fn reply(fragments: &[&str]) -> Self {
        Script::Reply(fragments.iter().map(|f| f.to_string()).collect())
    }
}

/// In-process backend that plays back scripts in order and records requests.
///
/// Used to drive the turn runner and the gateway without a network.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<CompletionRequest>>,
    fragment_delay: Option<Duration>,
}

impl ScriptedBackend {
    /// Plays `scripts` in order, one per request.
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            fragment_delay: None,
        }
    }

    /// Sleeps before each fragment, so concurrent turns interleave.
    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = Some(delay);
        self
    }

    /// Queues one more script.
    pub async fn push(&self, script: Script) {
        self.scripts.lock().await.push_back(script);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn stream_completion(&self, request: &CompletionRequest) -> AddaResult<CompletionStream> {
        self.requests.lock().await.push(request.clone());

        let script = self
            .scripts
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| AddaError::Provider("no scripted reply left".to_string()))?;

        let (fragments, error) = match script {
            Script::Refuse(message) => return Err(AddaError::Http(message)),
            Script::Reply(fragments) => (fragments, None),
            Script::FailAfter { fragments, error } => (fragments, Some(error)),
        };

        let delay = self.fragment_delay;
        let (tx, stream) = CompletionStream::channel();
        tokio::spawn(async move {
            for text in fragments {
                if let Some(d) = delay {
                    tokio::time::sleep(d).await;
                }
                if tx.send(StreamEvent::TextDelta { text }).await.is_err() {
                    return;
                }
            }
            let last = match error {
                Some(message) => StreamEvent::Error { message },
                None => StreamEvent::Done,
            };
            let _ = tx.send(last).await;
        });
        Ok(stream)
    }
}
