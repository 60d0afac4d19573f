use crate::session::Session;
use adda_core::{Message, PersonaConfig};
use std::sync::Arc;

/// The fixed preamble of every request: the persona's system prompt followed
/// by its seed exchanges as alternating user/assistant messages.
///
/// Built once per session and shared by reference afterwards; cloning a
/// `ContextLog` never copies the messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLog {
    messages: Arc<[Message]>,
}

impl ContextLog {
    /// System prompt, then each seed exchange as a user/assistant pair.
    pub fn from_persona(persona: &PersonaConfig) -> Self {
        let mut messages = Vec::with_capacity(1 + 2 * persona.seed_exchanges.len());
        messages.push(Message::system(&persona.system_prompt));
        for seed in &persona.seed_exchanges {
            messages.push(Message::user(&seed.question));
            messages.push(Message::assistant(&seed.answer));
        }
        Self {
            messages: messages.into(),
        }
    }

    /// Messages in send order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether two logs share the same allocation.
    pub fn ptr_eq(&self, other: &ContextLog) -> bool {
        Arc::ptr_eq(&self.messages, &other.messages)
    }
}

/// Assembles the message list for the next turn.
///
/// Context log, then the visible transcript in append order, then the new
/// user message. Reads the session only.
pub fn build_request_messages(session: &Session, new_user_text: &str) -> Vec<Message> {
    let context = session.context_log().messages();
    let transcript = session.transcript().messages();

    let mut messages = Vec::with_capacity(context.len() + transcript.len() + 1);
    messages.extend_from_slice(context);
    messages.extend_from_slice(transcript);
    messages.push(Message::user(new_user_text));
    messages
}
