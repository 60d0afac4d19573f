//! The conversational core of Adda: provider configuration, the streaming
//! completion client, the stream renderer and the per-turn runner.

/// Provider backends.
pub mod backends;
/// Provider configuration and credentials.
pub mod config;
/// Completion requests and the client.
pub mod llm;
/// One chat turn, end to end.
pub mod runner;
/// Streaming events and progressive rendering.
pub mod stream;

pub use backends::scripted::{Script, ScriptedBackend};
pub use backends::LlmBackend;
pub use config::{LlmProvider, ModelConfig, DEFAULT_API_KEY_ENV};
pub use llm::{CompletionRequest, LlmClient, MAX_TOKENS};
pub use runner::{ChatRunner, TurnOutcome};
pub use stream::{render_stream, CompletionStream, DisplaySurface, StreamEvent, CURSOR};
