//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ChatRequest, CommandResponse, ConfigurationRequest, ErrorResponse, ExamplesResponse,
    PositionRequest, PromptRequest, SelectRequest, SessionCreatedResponse, StatusRequest,
    SuccessResponse,
};
use super::AppState;
use crate::flow::render::{DiagramView, TranscriptView};
use crate::flow::{example_prompts, Position};
use crate::runtime::{RuntimeError, SessionHandle, SessionSnapshot};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/:id",
            get(get_session).delete(delete_session),
        )
        // Render contracts
        .route("/api/sessions/:id/diagram", get(get_diagram))
        .route("/api/sessions/:id/transcript", get(get_transcript))
        .route("/api/sessions/:id/stream", get(stream_session))
        // Conversation
        .route("/api/sessions/:id/prompt", post(create_from_prompt))
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/reset", post(reset_session))
        // Node inspection
        .route("/api/sessions/:id/select", post(select_node))
        .route(
            "/api/sessions/:id/nodes/:node_id/status",
            post(update_node_status),
        )
        .route(
            "/api/sessions/:id/nodes/:node_id/configuration",
            post(update_node_configuration),
        )
        .route(
            "/api/sessions/:id/nodes/:node_id/position",
            post(update_node_position),
        )
        .route("/api/examples", get(list_examples))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<SessionCreatedResponse> {
    let handle = state.sessions.create_session().await;
    Json(SessionCreatedResponse {
        session_id: handle.session_id().to_string(),
    })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = session(&state, &id).await?;
    Ok(Json(handle.snapshot()))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.remove(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// Render Contracts
// ============================================================

async fn get_diagram(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DiagramView>, AppError> {
    let handle = session(&state, &id).await?;
    let pipeline = handle.pipeline();
    Ok(Json(DiagramView::from_pipeline(pipeline.as_ref())))
}

async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptView>, AppError> {
    let handle = session(&state, &id).await?;
    Ok(Json(TranscriptView::from_messages(&handle.transcript())))
}

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let handle = session(&state, &id).await?;
    // Subscribe first so nothing published after the snapshot is missed
    let broadcast_rx = handle.subscribe();
    Ok(sse_stream(handle.snapshot(), broadcast_rx))
}

// ============================================================
// Conversation
// ============================================================

async fn create_from_prompt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let req = body(payload)?;
    applied(handle.create_from_prompt(req.text).await)
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let req = body(payload)?;
    applied(handle.process_user_input(req.text).await)
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>, AppError> {
    let handle = session(&state, &id).await?;
    applied(handle.reset().await)
}

// ============================================================
// Node Inspection
// ============================================================

async fn select_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SelectRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let req = body(payload)?;
    applied(handle.select_node(req.node_id).await)
}

async fn update_node_status(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let req = body(payload)?;
    applied(handle.update_node_status(node_id, req.status).await)
}

async fn update_node_configuration(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
    payload: Result<Json<ConfigurationRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let req = body(payload)?;
    applied(
        handle
            .update_node_configuration(node_id, req.configuration)
            .await,
    )
}

async fn update_node_position(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
    payload: Result<Json<PositionRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, AppError> {
    let handle = session(&state, &id).await?;
    let req = body(payload)?;
    let position = Position { x: req.x, y: req.y };
    applied(handle.update_node_position(node_id, position).await)
}

// ============================================================
// Static Data
// ============================================================

async fn list_examples() -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        examples: example_prompts(),
    })
}

async fn get_version() -> &'static str {
    concat!("flow-architect ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Helpers
// ============================================================

async fn session(state: &AppState, id: &str) -> Result<SessionHandle, AppError> {
    Ok(state.sessions.get(id).await?)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn applied(result: Result<bool, RuntimeError>) -> Result<Json<CommandResponse>, AppError> {
    let applied = result?;
    Ok(Json(CommandResponse { applied }))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        match e {
            RuntimeError::SessionNotFound(_) => AppError::NotFound(e.to_string()),
            RuntimeError::RuntimeStopped => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
