use adda_core::{AddaError, AddaResult};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

/// Glyph appended to the partial text while a reply is still streaming.
pub const CURSOR: &str = "▌";

/// Events emitted during a streaming completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A chunk of text content from the assistant.
    TextDelta { text: String },

    /// The stream has finished successfully.
    Done,

    /// The provider or the transport failed; nothing follows.
    Error { message: String },
}

/// The fragments of one completion, in arrival order.
///
/// Finite and not restartable: it is consumed by value and ends after
/// [`StreamEvent::Done`], [`StreamEvent::Error`] or producer shutdown. The
/// producer side has room for a single event, so a fragment is only read off
/// the network once the previous one has been taken.
pub struct CompletionStream {
    inner: ReceiverStream<StreamEvent>,
}

impl CompletionStream {
    /// Creates a connected producer/consumer pair.
    pub fn channel() -> (mpsc::Sender<StreamEvent>, Self) {
        let (tx, rx) = mpsc::channel(1);
        (
            tx,
            Self {
                inner: ReceiverStream::new(rx),
            },
        )
    }
}

impl Stream for CompletionStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<StreamEvent>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Where the growing reply is shown.
pub trait DisplaySurface: Send {
    /// Replaces the visible reply with `text`.
    fn show(&mut self, text: &str);
}

/// Records every update, in order.
impl DisplaySurface for Vec<String> {
    fn show(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Drives `surface` from a fragment stream and returns the full reply.
///
/// Each non-empty fragment is appended to the accumulated text, which is then
/// shown with [`CURSOR`] after it. When the stream ends the text is shown once
/// more without the cursor. An error event aborts rendering before that final
/// update.
pub async fn render_stream<S>(fragments: S, surface: &mut dyn DisplaySurface) -> AddaResult<String>
where
    S: Stream<Item = StreamEvent>,
{
    let mut fragments = std::pin::pin!(fragments);
    let mut text = String::new();
    let mut count = 0usize;

    while let Some(event) = fragments.next().await {
        match event {
            StreamEvent::TextDelta { text: fragment } => {
                if fragment.is_empty() {
                    continue;
                }
                count += 1;
                text.push_str(&fragment);
                surface.show(&format!("{text}{CURSOR}"));
            }
            StreamEvent::Done => break,
            StreamEvent::Error { message } => {
                debug!(fragments = count, "Stream aborted");
                return Err(AddaError::Provider(message));
            }
        }
    }

    surface.show(&text);
    debug!(fragments = count, chars = text.chars().count(), "Stream rendered");
    Ok(text)
}
