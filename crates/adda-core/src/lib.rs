//! Core types shared across the Adda crates.
//!
//! # Main types
//!
//! - [`AddaError`]: Unified error enum for every Adda subsystem.
//! - [`AddaResult`]: Convenience alias for `Result<T, AddaError>`.
//! - [`Role`] / [`Message`]: One entry of a conversation, in provider wire shape.
//! - [`PersonaConfig`]: The system prompt and seed exchanges that define a character.
//! - [`PersonaRegistry`]: Keyed lookup of the personas a deployment offers.

/// Error type.
pub mod error;
/// Conversation messages.
pub mod message;
/// Personas and the registry.
pub mod persona;

pub use error::{AddaError, AddaResult};
pub use message::{Message, Role};
pub use persona::{PersonaConfig, PersonaRegistry, Presentation, SeedExchange};
