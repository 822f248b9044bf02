//! The orchestrator's six HTTP endpoints (spec.md §6). Every handler is a
//! thin wrapper: parse the body, call straight into `conductor_engine`,
//! report the outcome.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use conductor_core::MCPServer;
use conductor_engine::{AdminHandler, ExecutionEngine, OwnerMessage, PlanRequest, Planner};
use conductor_error::{EngineError, ServerError, ServerErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::instrument;
use uuid::Uuid;

/// Shared state for every route, built once by the `conductor` binary at
/// startup from its wired-up engine components.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
    pub admin: Arc<AdminHandler>,
    pub execution: Arc<ExecutionEngine>,
    pub servers: Arc<HashMap<String, MCPServer>>,
    /// User id the Planner assigns newly created plans to when a message's
    /// sender doesn't name one explicitly.
    pub default_assignee: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/create_plan", post(create_plan))
        .route("/api/ask_admin", post(ask_admin))
        .route("/api/perform", post(perform))
        .route("/api/agent_message", post(agent_message))
        .route("/api/get_servers", get(get_servers))
        .route("/api/get_tools", get(get_tools))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Local wrapper so the foreign [`ServerError`] can implement the foreign
/// `IntoResponse` trait (the orphan rule forbids doing so directly).
struct AppError(ServerError);

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError(ServerError::from(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.kind {
            ServerErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[instrument(skip(state, request), fields(room_id = %request.room_id))]
async fn create_plan(State(state): State<AppState>, Json(request): Json<PlanRequest>) -> Result<impl IntoResponse, AppError> {
    let plan_id = state.planner.create_plan(request).await?;
    Ok((StatusCode::OK, Json(json!({ "plan_id": plan_id }))))
}

#[instrument(skip(state, msg), fields(room_id = %msg.room_id))]
async fn ask_admin(State(state): State<AppState>, Json(msg): Json<OwnerMessage>) -> Result<impl IntoResponse, AppError> {
    state.admin.ask_admin(msg).await?;
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}

#[derive(Debug, Deserialize)]
struct PerformRequest {
    log_id: Uuid,
}

#[instrument(skip(state))]
async fn perform(State(state): State<AppState>, Json(req): Json<PerformRequest>) -> Result<impl IntoResponse, AppError> {
    state.execution.perform(req.log_id).await?;
    Ok((StatusCode::OK, Json(json!({ "status": "ok" }))))
}

/// Inbound chat message notification from the realtime bus. Dispatches to
/// the Planner on an `@agent` mention, the Admin Handler on an `@admin`
/// mention, and is a no-op otherwise — the socket client posts every
/// message here and lets the orchestrator decide what warrants a response.
#[derive(Debug, Deserialize)]
struct AgentMessageRequest {
    room_id: String,
    sender: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct AgentMessageResponse {
    dispatched: &'static str,
}

#[instrument(skip(state, req), fields(room_id = %req.room_id))]
async fn agent_message(State(state): State<AppState>, Json(req): Json<AgentMessageRequest>) -> Result<impl IntoResponse, AppError> {
    if req.content.contains("@admin") {
        state
            .admin
            .ask_admin(OwnerMessage {
                room_id: req.room_id,
                owner_id: req.sender,
                owner_message: req.content,
                trust: false,
            })
            .await?;
        return Ok((StatusCode::OK, Json(AgentMessageResponse { dispatched: "admin" })));
    }

    if req.content.contains("@agent") {
        state
            .planner
            .create_plan(PlanRequest {
                room_id: req.room_id,
                query: req.content,
                summoner: req.sender.clone(),
                assigner: req.sender,
                assignee: state.default_assignee.clone(),
            })
            .await?;
        return Ok((StatusCode::OK, Json(AgentMessageResponse { dispatched: "planner" })));
    }

    Ok((StatusCode::OK, Json(AgentMessageResponse { dispatched: "none" })))
}

#[instrument(skip(state))]
async fn get_servers(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.servers.as_ref()))
}

#[derive(Debug, Deserialize)]
struct GetToolsQuery {
    server: Option<String>,
}

#[instrument(skip(state, query))]
async fn get_tools(State(state): State<AppState>, Query(query): Query<GetToolsQuery>) -> Result<impl IntoResponse, AppError> {
    match query.server {
        Some(name) => {
            let server = state.servers.get(&name).ok_or_else(|| {
                AppError(ServerError::new(ServerErrorKind::BadRequest(format!("unknown server: {name}"))))
            })?;
            Ok((StatusCode::OK, Json(json!({ name: conductor_mcp::function_descriptors(server) }))))
        }
        None => {
            let all = conductor_mcp::all_function_descriptors(state.servers.values());
            Ok((StatusCode::OK, Json(json!(all))))
        }
    }
}
