//! Agent Routes - Chat with the studio operations agent
//!
//! HTTP handlers that delegate to AgentService for business logic.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use aperture::{AgentFailure, DomainError};

use crate::models::{ChatRequest, ChatResponse, HistoryQuery, MessageResponse, ToolSchemaResponse};
use crate::{AppAgentService, AppState};

const AGENT_DISABLED: &str = "Agent is not configured: set OPENAI_API_KEY";

fn agent(state: &AppState) -> Result<Arc<AppAgentService>, (StatusCode, String)> {
    state
        .agent
        .clone()
        .ok_or_else(|| (StatusCode::SERVICE_UNAVAILABLE, AGENT_DISABLED.to_string()))
}

/// Send a message to the agent
#[utoipa::path(
    post,
    path = "/api/agent/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Agent reply", body = ChatResponse),
        (status = 400, description = "Empty message"),
        (status = 404, description = "Studio not found"),
        (status = 500, description = "Agent failed"),
        (status = 503, description = "LLM not configured")
    ),
    tag = "Agent"
)]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    if payload.message.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "message must not be empty".to_string()));
    }
    let agent = agent(&state)?;

    let ctx = agent
        .create_context(payload.studio_id, payload.user_id)
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                AgentFailure::from(other).to_string(),
            ),
        })?;

    let reply = agent
        .run_turn(ctx, &payload.message)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(reply.into()))
}

/// Get the stored messages of a session
///
/// Sessions are looked up by id alone. Any holder of the API key can read
/// any studio's session.
#[utoipa::path(
    get,
    path = "/api/agent/sessions/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Chat session ID"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Messages, oldest first", body = Vec<MessageResponse>),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error"),
        (status = 503, description = "LLM not configured")
    ),
    tag = "Agent"
)]
pub async fn get_session_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageResponse>>, (StatusCode, String)> {
    let agent = agent(&state)?;

    let messages = agent
        .history(id, query.effective_limit())
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        })?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// List the tools offered to the model
#[utoipa::path(
    get,
    path = "/api/agent/tools",
    responses(
        (status = 200, description = "Function-calling schemas", body = Vec<ToolSchemaResponse>)
    ),
    tag = "Agent"
)]
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolSchemaResponse>> {
    Json(
        state
            .tools
            .function_tools()
            .into_iter()
            .map(Into::into)
            .collect(),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/agent/chat", post(chat))
        .route("/api/agent/sessions/:id/messages", get(get_session_messages))
        .route("/api/agent/tools", get(list_tools))
}
