use crate::config::ModelConfig;
use crate::llm::{CompletionRequest, LlmClient};
use crate::stream::{render_stream, DisplaySurface};
use adda_core::AddaResult;
use adda_session::{build_request_messages, Session, TurnState};
use tracing::{info, warn};

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// What was appended to the transcript as the assistant message.
    pub reply: String,
    /// The provider error the reply stands in for, if the turn failed.
    pub error: Option<String>,
}

impl TurnOutcome {
    /// Whether the reply is a fallback.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Runs chat turns: assemble context, stream the completion, record the reply.
pub struct ChatRunner {
    llm: LlmClient,
    config: ModelConfig,
}

impl ChatRunner {
    /// A runner talking to the provider in `config`.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            llm: LlmClient::new(config.clone()),
            config,
        }
    }

    /// Uses `llm` instead of the backend `config.provider` would select.
    pub fn with_client(config: ModelConfig, llm: LlmClient) -> Self {
        Self { llm, config }
    }

    /// Model settings in use.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Runs one turn for `session`, showing the reply on `surface` as it streams.
    ///
    /// Provider failures never surface as `Err`: the persona's fallback reply
    /// is shown and recorded instead, so every turn adds exactly one user and
    /// one assistant message. `Err` only reports a session that was not idle.
    pub async fn run_turn(
        &self,
        session: &mut Session,
        user_text: &str,
        surface: &mut dyn DisplaySurface,
    ) -> AddaResult<TurnOutcome> {
        let session_id = session.id;
        session.transition(TurnState::AwaitingUserInput)?;
        session.transition(TurnState::Submitting)?;

        let persona = session.persona().clone();
        let messages = build_request_messages(session, user_text);
        session.append_user(user_text);

        let temperature = persona.temperature.unwrap_or(self.config.temperature);
        let request = CompletionRequest::new(&self.config.model_id, messages, temperature);

        info!(
            session_id = %session_id,
            persona = %persona.key,
            messages = request.messages.len(),
            "Submitting turn"
        );

        let result = match self.llm.stream_completion(&request).await {
            Ok(fragments) => {
                session.transition(TurnState::Streaming)?;
                render_stream(fragments, surface).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => {
                session.append_assistant(&reply);
                session.transition(TurnState::Idle)?;
                info!(session_id = %session_id, chars = reply.chars().count(), "Turn completed");
                Ok(TurnOutcome { reply, error: None })
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Turn failed, sending fallback reply");
                session.transition(TurnState::FailedTurn)?;
                let detail = e.to_string();
                let reply = persona.fallback_reply(&detail);
                surface.show(&reply);
                session.append_assistant(&reply);
                session.transition(TurnState::Idle)?;
                Ok(TurnOutcome {
                    reply,
                    error: Some(detail),
                })
            }
        }
    }
}
