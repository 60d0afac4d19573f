use adda_agent::{ChatRunner, DisplaySurface};
use adda_core::PersonaConfig;
use adda_session::Session;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// A frame sent by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// One user message.
    Chat { content: String },
    /// Start a new conversation.
    Clear,
}

impl InboundFrame {
    /// Parses a text frame; anything that is not a known JSON frame is chat text.
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_else(|_| InboundFrame::Chat {
            content: text.to_string(),
        })
    }
}

/// A frame sent to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    /// Sent once, right after the socket opens.
    Connected {
        session_id: Uuid,
        persona: String,
        title: String,
    },
    /// The reply as shown so far; replaces the previous partial.
    Partial { content: String },
    /// The turn finished; `content` is what the transcript recorded.
    Final { content: String },
    /// The turn failed; `content` is the persona's apology.
    Fallback { content: String },
    /// The transcript was emptied.
    Cleared,
    /// The input was rejected and no turn was started.
    Error { content: String },
}

impl OutboundFrame {
    /// Encodes the frame as a JSON text message.
    pub fn to_json(&self) -> String {
        // Every variant holds only strings and UUIDs.
        serde_json::to_string(self).unwrap_or_else(|e| {
            error!(error = %e, "Failed to encode frame");
            String::from(r#"{"type":"error","content":"internal encoding error"}"#)
        })
    }
}

/// Frames a connection may have queued for its socket.
pub const OUTBOUND_QUEUE: usize = 16;

/// Shows partial replies by pushing frames onto the socket's outbound queue.
///
/// Each partial carries the whole reply so far, so a partial that finds the
/// queue full is skipped; the next one supersedes it.
pub struct FrameSurface {
    tx: mpsc::Sender<String>,
}

impl FrameSurface {
    /// Sends partials on `tx`.
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

impl DisplaySurface for FrameSurface {
    fn show(&mut self, text: &str) {
        let frame = OutboundFrame::Partial {
            content: text.to_string(),
        };
        if self.tx.try_send(frame.to_json()).is_err() {
            debug!("Outbound queue full, skipping partial frame");
        }
    }
}

/// One browser connection and the session it owns.
pub struct ChatConnection {
    /// Connection id, for logs.
    pub id: Uuid,
    session: Session,
    runner: Arc<ChatRunner>,
    max_message_length: usize,
}

impl ChatConnection {
    /// Opens a fresh session for `persona`.
    pub fn new(
        runner: Arc<ChatRunner>,
        persona: Arc<PersonaConfig>,
        max_message_length: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session: Session::new(persona),
            runner,
            max_message_length,
        }
    }

    /// The session this connection owns.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The `connected` frame for this connection.
    pub fn welcome(&self) -> OutboundFrame {
        let persona = self.session.persona();
        OutboundFrame::Connected {
            session_id: self.session.id,
            persona: persona.key.clone(),
            title: persona.title().to_string(),
        }
    }

    /// Handles one inbound frame, sending every resulting frame to `out`.
    pub async fn handle(&mut self, frame: InboundFrame, out: &mpsc::Sender<String>) {
        match frame {
            InboundFrame::Clear => {
                self.session.reset();
                info!(connection_id = %self.id, session_id = %self.session.id, "Conversation cleared");
                let _ = out.send(OutboundFrame::Cleared.to_json()).await;
            }
            InboundFrame::Chat { content } => self.chat(content, out).await,
        }
    }

    async fn chat(&mut self, content: String, out: &mpsc::Sender<String>) {
        // Validation looks at the trimmed text; the model gets it as typed.
        if let Some(reason) = self.reject_reason(content.trim()) {
            warn!(connection_id = %self.id, reason = %reason, "Rejected chat input");
            let _ = out.send(OutboundFrame::Error { content: reason }.to_json()).await;
            return;
        }

        let mut surface = FrameSurface::new(out.clone());
        let frame = match self
            .runner
            .run_turn(&mut self.session, &content, &mut surface)
            .await
        {
            Ok(outcome) if outcome.failed() => OutboundFrame::Fallback {
                content: outcome.reply,
            },
            Ok(outcome) => OutboundFrame::Final {
                content: outcome.reply,
            },
            Err(e) => {
                error!(connection_id = %self.id, error = %e, "Turn could not start");
                OutboundFrame::Error {
                    content: "A reply is already in progress".to_string(),
                }
            }
        };
        let _ = out.send(frame.to_json()).await;
    }

    fn reject_reason(&self, content: &str) -> Option<String> {
        if content.is_empty() {
            Some("Message is empty".to_string())
        } else if content.chars().count() > self.max_message_length {
            Some(format!(
                "Message is longer than {} characters",
                self.max_message_length
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use adda_agent::{LlmClient, ModelConfig, Script, ScriptedBackend};

    fn connection(scripts: Vec<Script>) -> ChatConnection {
        let backend = Arc::new(ScriptedBackend::new(scripts));
        let runner = ChatRunner::with_client(ModelConfig::default(), LlmClient::from_backend(backend));
        ChatConnection::new(
            Arc::new(runner),
            Arc::new(PersonaConfig::chhapri_bhaiya()),
            20,
        )
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    #[test]
    fn parse_accepts_json_and_plain_text() {
        assert_eq!(InboundFrame::parse(r#"{"type":"clear"}"#), InboundFrame::Clear);
        assert_eq!(
            InboundFrame::parse(r#"{"type":"chat","content":"hi"}"#),
            InboundFrame::Chat {
                content: "hi".into()
            }
        );
        assert_eq!(
            InboundFrame::parse("just text"),
            InboundFrame::Chat {
                content: "just text".into()
            }
        );
    }

    #[test]
    fn frames_are_tagged() {
        let json = OutboundFrame::Partial {
            content: "Ar▌".into(),
        }
        .to_json();
        assert_eq!(json, r#"{"type":"partial","content":"Ar▌"}"#);
        assert_eq!(OutboundFrame::Cleared.to_json(), r#"{"type":"cleared"}"#);
    }

    #[tokio::test]
    async fn chat_streams_partials_then_final() {
        let mut conn = connection(vec![Script::reply(&["Ar", "re"])]);
        let (tx, mut rx) = mpsc::channel(64);

        conn.handle(InboundFrame::parse("Hi"), &tx).await;

        let frames = drain(&mut rx);
        let types: Vec<_> = frames.iter().map(|f| f["type"].as_str().unwrap()).collect();
        assert_eq!(types, vec!["partial", "partial", "partial", "final"]);
        assert_eq!(frames[1]["content"], "Arre▌");
        assert_eq!(frames[3]["content"], "Arre");
        assert_eq!(conn.session().transcript().len(), 2);
    }

    #[tokio::test]
    async fn failed_turn_sends_fallback() {
        let mut conn = connection(vec![Script::Refuse("dns failure".into())]);
        let (tx, mut rx) = mpsc::channel(64);

        conn.handle(InboundFrame::parse("Hi"), &tx).await;

        let frames = drain(&mut rx);
        let last = frames.last().unwrap();
        assert_eq!(last["type"], "fallback");
        assert!(last["content"].as_str().unwrap().contains("dns failure"));
        assert_eq!(conn.session().transcript().len(), 2);
    }

    #[tokio::test]
    async fn chat_text_reaches_transcript_untrimmed() {
        let mut conn = connection(vec![Script::reply(&["ok"])]);
        let (tx, _rx) = mpsc::channel(64);

        conn.handle(InboundFrame::parse("  line one\n  indented\n"), &tx)
            .await;

        let user = &conn.session().transcript().messages()[0];
        assert_eq!(user.content, "  line one\n  indented\n");
    }

    #[tokio::test]
    async fn rejected_input_starts_no_turn() {
        let mut conn = connection(vec![]);
        let (tx, mut rx) = mpsc::channel(64);

        conn.handle(InboundFrame::parse("   "), &tx).await;
        conn.handle(InboundFrame::parse(&"x".repeat(21)), &tx).await;

        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f["type"] == "error"));
        assert!(conn.session().transcript().is_empty());
    }

    #[tokio::test]
    async fn slow_reader_still_gets_final_reply() {
        let mut conn = connection(vec![Script::reply(&["a", "b", "c", "d", "e", "f"])]);
        let (tx, mut rx) = mpsc::channel::<String>(1);

        let reader = async {
            let mut frames = Vec::new();
            while let Some(frame) = rx.recv().await {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                let frame: serde_json::Value = serde_json::from_str(&frame).unwrap();
                let done = frame["type"] == "final";
                frames.push(frame);
                if done {
                    break;
                }
            }
            frames
        };
        let (_, frames) = tokio::join!(conn.handle(InboundFrame::parse("Hi"), &tx), reader);

        let last = frames.last().unwrap();
        assert_eq!(last["type"], "final");
        assert_eq!(last["content"], "abcdef");
        assert!(frames.len() <= 8);
    }

    #[tokio::test]
    async fn clear_resets_transcript() {
        let mut conn = connection(vec![Script::reply(&["ok"])]);
        let (tx, mut rx) = mpsc::channel(64);
        let session_id = conn.session().id;

        conn.handle(InboundFrame::parse("Hi"), &tx).await;
        conn.handle(InboundFrame::Clear, &tx).await;

        assert_eq!(drain(&mut rx).last().unwrap()["type"], "cleared");
        assert!(conn.session().transcript().is_empty());
        assert_eq!(conn.session().id, session_id);
    }
}
