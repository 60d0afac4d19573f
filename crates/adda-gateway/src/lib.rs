//! Browser-facing side of Adda: the chat page, the `/ws` frame protocol and
//! the axum router that ties one session to each connection.

/// HTML for `/`.
pub mod page;
/// Frames and per-connection chat handling.
pub mod router;
/// Routes and socket lifecycle.
pub mod server;

pub use router::{ChatConnection, InboundFrame, OutboundFrame, OUTBOUND_QUEUE};
pub use server::{GatewayOptions, GatewayServer};
