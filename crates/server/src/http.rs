//! HTTP Endpoints
//!
//! REST API for the voice assistant.

use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use voxta_agent::{ActionOutcome, AssistantReply, SessionSnapshot};
use voxta_config::constants::session::ANONYMOUS_USER;
use voxta_core::ClassificationResult;

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.settings.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        .route("/api/command", post(command))
        .route("/api/command/execute", post(execute_command))
        .route("/api/classify", post(classify))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:user_id", get(get_session))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - disabled: no cross-origin access
/// - enabled without origins: any origin
/// - otherwise the configured origins; unparsable ones are skipped
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        return CorsLayer::new();
    }

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        tracing::warn!("No CORS origins configured, allowing any origin");
        return base.allow_origin(Any);
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    base.allow_origin(parsed_origins)
}

/// Utterance from a user
#[derive(Debug, Deserialize)]
struct CommandRequest {
    #[serde(default)]
    user_id: Option<String>,
    text: String,
    /// Item to bid on (name, description or category fragment)
    #[serde(default)]
    auction_item: Option<String>,
}

impl CommandRequest {
    /// User id and text, rejecting blank utterances
    fn parts(&self) -> Result<(&str, &str), ServerError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ServerError::InvalidRequest("text must not be empty".to_string()));
        }
        let user_id = self
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(ANONYMOUS_USER);
        Ok((user_id, text))
    }
}

/// Reply plus what executing it did
#[derive(Debug, Serialize)]
struct ExecuteResponse {
    reply: AssistantReply,
    outcome: ActionOutcome,
}

/// Classify and phrase a reply
async fn command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<AssistantReply>, ServerError> {
    let (user_id, text) = request.parts()?;
    let reply = state
        .processor
        .process(user_id, text)
        .await?
        .with_auction_item(request.auction_item.clone());
    Ok(Json(reply))
}

/// Classify, phrase and carry out
async fn execute_command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<ExecuteResponse>, ServerError> {
    let (user_id, text) = request.parts()?;
    let reply = state
        .processor
        .process(user_id, text)
        .await?
        .with_auction_item(request.auction_item.clone());
    let outcome = state.processor.execute(&reply, user_id).await;

    Ok(Json(ExecuteResponse { reply, outcome }))
}

/// Bare classification; the turn is still recorded
async fn classify(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<ClassificationResult>, ServerError> {
    let (user_id, text) = request.parts()?;
    let result = state.processor.classify(user_id, text).await?;
    Ok(Json(result))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ServerError> {
    state
        .sessions()
        .snapshot(&user_id)
        .map(Json)
        .ok_or(ServerError::SessionNotFound(user_id))
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut users = state.sessions().user_ids();
    users.sort();
    Json(serde_json::json!({
        "count": users.len(),
        "sessions": users,
    }))
}

/// Health check that also probes the auction backend
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let backend = state.auctions.name().to_string();
    let sessions = state.sessions().len();

    match state.auctions.active_items().await {
        Ok(items) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "auction_backend": backend,
                "active_auctions": items.len(),
                "sessions": sessions,
            })),
        ),
        Err(e) => {
            tracing::warn!(backend = %backend, error = %e, "Health check: auction service unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "degraded",
                    "version": env!("CARGO_PKG_VERSION"),
                    "auction_backend": backend,
                    "error": e.to_string(),
                    "sessions": sessions,
                })),
            )
        }
    }
}
