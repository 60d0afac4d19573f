use crate::page;
use crate::router::{ChatConnection, InboundFrame, OutboundFrame, OUTBOUND_QUEUE};
use adda_agent::ChatRunner;
use adda_core::PersonaRegistry;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Gateway tunables.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Longest accepted chat input, in characters.
    pub max_message_length: usize,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            max_message_length: 4000,
        }
    }
}

enum Mode {
    Ready(Arc<ChatRunner>),
    /// Startup configuration failed; serve the diagnostic, create no sessions.
    Halted(String),
}

/// Shared application state. Holds no conversation state.
struct AppState {
    mode: Mode,
    personas: PersonaRegistry,
    options: GatewayOptions,
    connections: AtomicUsize,
}

#[derive(Debug, Default, Deserialize)]
struct PersonaQuery {
    persona: Option<String>,
}

/// The main gateway server.
pub struct GatewayServer;

impl GatewayServer {
    /// Build the chat gateway.
    pub fn build(
        runner: Arc<ChatRunner>,
        personas: PersonaRegistry,
        options: GatewayOptions,
    ) -> Router {
        Self::router(AppState {
            mode: Mode::Ready(runner),
            personas,
            options,
            connections: AtomicUsize::new(0),
        })
    }

    /// Build a gateway that only reports `diagnostic`.
    pub fn build_halted(diagnostic: impl Into<String>, personas: PersonaRegistry) -> Router {
        Self::router(AppState {
            mode: Mode::Halted(diagnostic.into()),
            personas,
            options: GatewayOptions::default(),
            connections: AtomicUsize::new(0),
        })
    }

    fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/ws", get(ws_handler))
            .route("/health", get(health_handler))
            .route("/personas", get(personas_handler))
            .with_state(Arc::new(state))
    }
}

async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PersonaQuery>,
) -> Html<String> {
    match &state.mode {
        Mode::Ready(_) => {
            let persona = state.personas.resolve(query.persona.as_deref());
            Html(page::render_chat(&persona))
        }
        Mode::Halted(diagnostic) => Html(page::render_halted(diagnostic)),
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let connections = state.connections.load(Ordering::Relaxed);
    match &state.mode {
        Mode::Ready(_) => Json(serde_json::json!({
            "status": "ok",
            "service": "adda",
            "connections": connections,
        })),
        Mode::Halted(diagnostic) => Json(serde_json::json!({
            "status": "misconfigured",
            "service": "adda",
            "error": diagnostic,
        })),
    }
}

async fn personas_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let default_key = state.personas.default_persona().key.clone();
    let list: Vec<_> = state
        .personas
        .list()
        .iter()
        .map(|p| {
            serde_json::json!({
                "key": p.key,
                "name": p.name,
                "title": p.title(),
                "default": p.key == default_key,
            })
        })
        .collect();
    Json(list)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<PersonaQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.persona))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, persona_key: Option<String>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let runner = match &state.mode {
        Mode::Ready(runner) => runner.clone(),
        Mode::Halted(diagnostic) => {
            warn!("Refusing chat connection: gateway is halted");
            let frame = OutboundFrame::Error {
                content: diagnostic.clone(),
            };
            let _ = ws_sender.send(Message::Text(frame.to_json().into())).await;
            let _ = ws_sender.send(Message::Close(None)).await;
            return;
        }
    };

    let persona = state.personas.resolve(persona_key.as_deref());
    let mut connection = ChatConnection::new(runner, persona, state.options.max_message_length);
    let connection_id = connection.id;
    state.connections.fetch_add(1, Ordering::Relaxed);

    info!(
        connection_id = %connection_id,
        session_id = %connection.session().id,
        persona = %connection.session().persona().key,
        "WebSocket connected"
    );

    // Channel for sending frames back to the WebSocket
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_QUEUE);
    let _ = tx.send(connection.welcome().to_json()).await;

    // Task: forward frames from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Task: receive frames and run turns; the connection owns its session
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let frame = InboundFrame::parse(text.as_str());
                    connection.handle(frame, &tx).await;
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    state.connections.fetch_sub(1, Ordering::Relaxed);
    info!(connection_id = %connection_id, "WebSocket disconnected");
}
