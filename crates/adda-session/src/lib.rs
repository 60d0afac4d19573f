//! Per-connection conversation state: the persona context, the transcript
//! and the turn state machine.

/// The fixed context and request assembly.
pub mod context;
/// Transcript and turn state.
pub mod session;

pub use context::{build_request_messages, ContextLog};
pub use session::{Session, Transcript, TurnState};
