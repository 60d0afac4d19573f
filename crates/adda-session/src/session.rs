use crate::context::ContextLog;
use adda_core::{AddaError, AddaResult, Message, PersonaConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Where a session is within the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// Ready for input.
    Idle,
    /// Input is being collected.
    AwaitingUserInput,
    /// Request sent, no stream yet.
    Submitting,
    /// Fragments are arriving.
    Streaming,
    /// The turn failed; a fallback is being recorded.
    FailedTurn,
}

impl TurnState {
    /// Whether `self -> next` is an edge of the per-turn state machine.
    ///
    /// `Submitting -> FailedTurn` covers requests the provider refuses before
    /// any stream exists.
    pub fn can_transition_to(self, next: TurnState) -> bool {
        use TurnState::*;
        matches!(
            (self, next),
            (Idle, AwaitingUserInput)
                | (AwaitingUserInput, Submitting)
                | (Submitting, Streaming)
                | (Submitting, FailedTurn)
                | (Streaming, Idle)
                | (Streaming, FailedTurn)
                | (FailedTurn, Idle)
        )
    }
}

/// The user-visible conversation. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The latest message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// Conversation state for one connection.
///
/// Owned exclusively by the task serving that connection; nothing in a
/// `Session` is shared with other sessions except the immutable persona.
#[derive(Debug, Clone)]
pub struct Session {
    /// Stable for the life of the connection, across resets.
    pub id: Uuid,
    persona: Arc<PersonaConfig>,
    context: ContextLog,
    transcript: Transcript,
    state: TurnState,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// When the transcript last changed.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// An idle session with an empty transcript for `persona`.
    pub fn new(persona: Arc<PersonaConfig>) -> Self {
        let now = Utc::now();
        let context = ContextLog::from_persona(&persona);
        Self {
            id: Uuid::new_v4(),
            persona,
            context,
            transcript: Transcript::default(),
            state: TurnState::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    /// The persona this session speaks as.
    pub fn persona(&self) -> &Arc<PersonaConfig> {
        &self.persona
    }

    /// The fixed context sent before the transcript.
    pub fn context_log(&self) -> &ContextLog {
        &self.context
    }

    /// Messages exchanged so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current turn state.
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Records the user message of a turn.
    pub fn append_user(&mut self, text: impl Into<String>) {
        self.updated_at = Utc::now();
        self.transcript.push(Message::user(text));
    }

    /// Records the reply (or fallback) of a turn.
    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.updated_at = Utc::now();
        self.transcript.push(Message::assistant(text));
    }

    /// Moves the turn state machine, rejecting edges it does not have.
    pub fn transition(&mut self, next: TurnState) -> AddaResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(AddaError::Session(format!(
                "illegal turn transition {:?} -> {:?}",
                self.state, next
            )));
        }
        debug!(session_id = %self.id, from = ?self.state, to = ?next, "Turn state");
        self.state = next;
        Ok(())
    }

    /// Clears the transcript and rebuilds the context log from the same persona.
    pub fn reset(&mut self) {
        self.transcript = Transcript::default();
        self.context = ContextLog::from_persona(&self.persona);
        self.state = TurnState::Idle;
        self.updated_at = Utc::now();
        debug!(session_id = %self.id, persona = %self.persona.key, "Session reset");
    }

    /// Context plus transcript length.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }
}
