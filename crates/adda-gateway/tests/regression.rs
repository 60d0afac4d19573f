#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Regression tests for adda-gateway: HTTP routes driven in-process
//! through the router, without binding a port.

use adda_agent::{ChatRunner, LlmClient, ModelConfig, ScriptedBackend};
use adda_core::{PersonaConfig, PersonaRegistry};
use adda_gateway::{GatewayOptions, GatewayServer};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

fn app(personas: PersonaRegistry) -> axum::Router {
    let backend = Arc::new(ScriptedBackend::default());
    let runner = ChatRunner::with_client(ModelConfig::default(), LlmClient::from_backend(backend));
    GatewayServer::build(Arc::new(runner), personas, GatewayOptions::default())
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_index_renders_default_persona() {
    let (status, page) = get(app(PersonaRegistry::with_builtins()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains(r#"data-persona="chhapri_bhaiya""#));
    assert!(page.contains("Bhai kuch puchna hai?"));
}

#[tokio::test]
async fn test_index_selects_persona_by_query() {
    let (_, page) = get(app(PersonaRegistry::with_builtins()), "/?persona=tobias_rieper").await;
    assert!(page.contains(r#"data-persona="tobias_rieper""#));
    assert!(page.contains("State your business."));
    assert!(page.contains("Freelance consultant. Discretion assured."));
}

#[tokio::test]
async fn test_index_unknown_persona_falls_back_to_default() {
    let (status, page) = get(app(PersonaRegistry::with_builtins()), "/?persona=ghost").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains(r#"data-persona="chhapri_bhaiya""#));
}

#[tokio::test]
async fn test_persona_markup_is_escaped() {
    let mut persona = PersonaConfig::tobias_rieper();
    persona.key = "agent".to_string();
    persona.presentation.title = "<script>alert(1)</script>".to_string();
    let (_, page) = get(app(PersonaRegistry::new(persona)), "/").await;
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!page.contains("<script>alert(1)"));
}

#[tokio::test]
async fn test_personas_lists_registry() {
    let mut registry = PersonaRegistry::with_builtins();
    registry.set_default("tobias_rieper").unwrap();

    let (status, body) = get(app(registry), "/personas").await;
    assert_eq!(status, StatusCode::OK);
    let list: serde_json::Value = serde_json::from_str(&body).unwrap();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["key"], "chhapri_bhaiya");
    assert_eq!(list[0]["title"], "😎 Chhapri Bhaiya");
    assert_eq!(list[0]["default"], false);
    assert_eq!(list[1]["key"], "tobias_rieper");
    assert_eq!(list[1]["default"], true);
}

#[tokio::test]
async fn test_health_starts_with_no_connections() {
    let (status, body) = get(app(PersonaRegistry::with_builtins()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 0);
}

#[tokio::test]
async fn test_halted_gateway_serves_diagnostic_everywhere() {
    let halted = GatewayServer::build_halted("missing key", PersonaRegistry::with_builtins());

    let (status, page) = get(halted.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("missing key"));
    assert!(!page.contains("data-persona"));

    let (_, body) = get(halted, "/health").await;
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "misconfigured");
    assert_eq!(body["error"], "missing key");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = get(app(PersonaRegistry::with_builtins()), "/sessions").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
