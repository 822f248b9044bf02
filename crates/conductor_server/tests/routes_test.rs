//! Integration tests driving the axum router directly via `tower::ServiceExt`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{NullLlm, NullPersistence, NullTools, NullTransport};
use conductor_core::{MCPServer, MCPTool};
use conductor_engine::{AdminHandler, ExecutionEngine, Planner};
use conductor_server::{create_router, AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

fn build_state() -> AppState {
    let persistence = Arc::new(NullPersistence::default());
    let transport = Arc::new(NullTransport);
    let llm = Arc::new(NullLlm);
    let tools = Arc::new(NullTools);

    let mut servers = HashMap::new();
    servers.insert(
        "fs".to_string(),
        MCPServer::new(
            "fs",
            "filesystem server",
            vec![MCPTool::new("read_file", "reads a file", json!({"type": "object", "properties": {}}))],
        ),
    );
    let servers = Arc::new(servers);

    let execution = Arc::new(ExecutionEngine::new(
        persistence.clone(),
        transport.clone(),
        llm.clone(),
        tools.clone(),
        servers.clone(),
    ));
    let planner = Arc::new(Planner::new(
        persistence.clone(),
        transport.clone(),
        llm.clone(),
        servers.clone(),
        execution.clone(),
    ));
    let admin = Arc::new(AdminHandler::new(persistence, transport, llm, servers.clone(), execution.clone()));

    AppState {
        planner,
        admin,
        execution,
        servers,
        default_assignee: "agent".to_string(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn get_servers_lists_registered_servers() {
    let router = create_router(build_state());
    let response = router
        .oneshot(Request::builder().uri("/api/get_servers").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["fs"]["name"], "fs");
    assert_eq!(body["fs"]["description"], "filesystem server");
    assert_eq!(body["fs"]["tools"][0]["name"], "read_file");
}

#[tokio::test]
async fn get_tools_for_unknown_server_is_bad_request() {
    let router = create_router(build_state());
    let response = router
        .oneshot(Request::builder().uri("/api/get_tools?server=nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_tools_for_known_server_returns_function_descriptors() {
    let router = create_router(build_state());
    let response = router
        .oneshot(Request::builder().uri("/api/get_tools?server=fs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["fs"][0]["function"]["name"], "read_file");
}

#[tokio::test]
async fn create_plan_with_no_skills_needed_returns_plan_id() {
    let router = create_router(build_state());
    let payload = json!({
        "room_id": "room-1",
        "query": "@agent just chatting, nothing to do",
        "summoner": "alice",
        "assigner": "alice",
        "assignee": "agent",
    });

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/create_plan")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["plan_id"].is_string());
}

#[tokio::test]
async fn perform_on_unknown_log_id_is_an_error_response() {
    let router = create_router(build_state());
    let payload = json!({ "log_id": uuid::Uuid::new_v4() });

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/perform")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn agent_message_with_no_mention_is_a_pure_no_op() {
    let router = create_router(build_state());
    let payload = json!({
        "room_id": "room-1",
        "sender": "alice",
        "content": "just chatting",
    });

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/agent_message")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["dispatched"], "none");
}
