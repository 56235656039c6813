use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::dispatcher::{self, AppState, FunctionResponse};

// ── Request types ──────────────────────────────────────────────────────────────

/// Cloud-function invocation envelope. The update itself arrives as a JSON
/// string in `body`; the other fields the runtime sends are ignored.
#[derive(Debug, Deserialize)]
struct FunctionEvent {
    #[serde(default)]
    body: String,
}

fn event_body(raw: &str) -> String {
    match serde_json::from_str::<FunctionEvent>(raw) {
        Ok(event) => event.body,
        Err(e) => {
            warn!("Unparseable function event: {}", e);
            String::new()
        }
    }
}

// ── Handlers ───────────────────────────────────────────────────────────────────

// Takes the body as a plain string so a bad envelope still gets a 200.
async fn function_event(
    State(state): State<Arc<AppState>>,
    raw: String,
) -> Json<FunctionResponse> {
    let body = event_body(&raw);
    Json(dispatcher::handle_update(&state, &body).await)
}

async fn webhook(State(state): State<Arc<AppState>>, body: String) -> StatusCode {
    dispatcher::handle_update(&state, &body).await;
    StatusCode::OK
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(function_event))
        .route("/webhook", post(webhook))
        .with_state(state)
}

// ── Entry point ────────────────────────────────────────────────────────────────

pub async fn run(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.server.listen.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
