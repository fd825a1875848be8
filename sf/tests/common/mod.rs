//! Shared test helpers: a scripted stand-in for the completion service

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use segfinder::config::{LlmConfig, ResolvedLlmConfig};
use tokio::net::TcpListener;

/// One request as the upstream saw it
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

#[derive(Clone, Default)]
struct UpstreamState {
    responses: Arc<Mutex<VecDeque<(u16, String)>>>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Completion service stub listening on an ephemeral port
pub struct StubUpstream {
    pub base_url: String,
    state: UpstreamState,
}

impl StubUpstream {
    /// Requests received so far
    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.state.captured.lock().unwrap().len()
    }

    /// Resolved client config pointing at this stub
    pub fn llm_config(&self) -> ResolvedLlmConfig {
        LlmConfig {
            base_url: self.base_url.clone(),
            ..LlmConfig::default()
        }
        .resolve_with(|name| (name == "OPENROUTER_API_KEY").then(|| "sk-test".to_string()))
        .unwrap()
    }
}

async fn completions(State(state): State<UpstreamState>, headers: HeaderMap, body: Bytes) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.captured.lock().unwrap().push(CapturedRequest { headers, body });

    let next = state.responses.lock().unwrap().pop_front();
    let (status, text) = next.unwrap_or((500, "stub exhausted".to_string()));
    (StatusCode::from_u16(status).unwrap(), text).into_response()
}

/// Start a stub that answers with `responses` in order
pub async fn spawn_upstream(responses: Vec<(u16, &str)>) -> StubUpstream {
    let state = UpstreamState {
        responses: Arc::new(Mutex::new(
            responses.into_iter().map(|(s, b)| (s, b.to_string())).collect(),
        )),
        captured: Arc::default(),
    };

    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubUpstream {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// Completion body carrying `content` as the first choice
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "gen-1",
        "model": "google/gemini-2.0-flash-001",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 20}
    })
    .to_string()
}

/// An address nothing is listening on
pub async fn closed_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
