mod common;

use common::{server_with_tool, FakeLlm, FakePersistence, FakeTools, FakeTransport};
use conductor_core::{GenerateResponse, Output, PlanStatus, TaskStatus, ToolCall};
use conductor_engine::{AdminHandler, ExecutionEngine, OwnerMessage, PlanRequest};
use std::collections::HashMap;
use std::sync::Arc;

fn text_response(text: &str) -> GenerateResponse {
    GenerateResponse {
        outputs: vec![Output::Text(text.to_string())],
    }
}

fn tool_call_response(name: &str, args: serde_json::Value) -> GenerateResponse {
    GenerateResponse {
        outputs: vec![Output::ToolCalls(vec![ToolCall {
            id: "call-1".to_string(),
            name: name.to_string(),
            arguments: args,
        }])],
    }
}

/// S1: a conversation the planner judges needs no tools completes immediately
/// with no tasks and a single chat message.
#[tokio::test]
async fn null_plan_completes_with_no_tasks() {
    let persistence = Arc::new(FakePersistence::default().with_user("assignee-1", "assistant"));
    let transport = Arc::new(FakeTransport::default());
    let llm = Arc::new(FakeLlm::queue(vec![text_response(r#"{"plan_name": "null_plan", "plan_overview": "nothing to do", "plan": {}}"#)]));
    let tools = Arc::new(FakeTools);
    let servers = Arc::new(HashMap::new());

    let execution = Arc::new(ExecutionEngine::new(persistence.clone(), transport.clone(), llm.clone(), tools, servers.clone()));
    let planner = conductor_engine::Planner::new(persistence.clone(), transport.clone(), llm, servers, execution);

    let plan_id = planner
        .create_plan(PlanRequest {
            room_id: "room-1".to_string(),
            query: "@agent just chatting".to_string(),
            summoner: "erik".to_string(),
            assigner: "erik".to_string(),
            assignee: "assignee-1".to_string(),
        })
        .await
        .unwrap();

    let plan = persistence.plans.lock().unwrap().get(&plan_id).cloned().unwrap();
    assert_eq!(*plan.status(), PlanStatus::Success);
    assert_eq!(*plan.progress(), 100);
    assert!(persistence.tasks.lock().unwrap().is_empty());
    assert_eq!(transport.sent.lock().unwrap().len(), 1);
}

/// S2/S3: a single-step plan creates one task, immediately opens an approval
/// for it, and `perform` executes it through to plan completion.
#[tokio::test]
async fn single_step_plan_approves_and_executes() {
    let persistence = Arc::new(FakePersistence::default().with_user("assignee-1", "assistant"));
    let transport = Arc::new(FakeTransport::default());
    let llm = Arc::new(FakeLlm::queue(vec![
        text_response(r#"{"plan_name": "Fetch a page", "plan_overview": "fetch it", "plan": {"step_1": {"name": "fetch", "assignee": "http", "explanation": "get it", "expected_result": "page body"}}}"#),
        tool_call_response("get", serde_json::json!({"url": "https://example.com"})),
        text_response("All done, fetched the page."),
    ]));
    let tools = Arc::new(FakeTools);
    let mut server_map = HashMap::new();
    server_map.insert("http".to_string(), server_with_tool("http", "get"));
    let servers = Arc::new(server_map);

    let execution = Arc::new(ExecutionEngine::new(persistence.clone(), transport.clone(), llm.clone(), tools, servers.clone()));
    let planner = conductor_engine::Planner::new(persistence.clone(), transport.clone(), llm, servers, execution.clone());

    let plan_id = planner
        .create_plan(PlanRequest {
            room_id: "room-1".to_string(),
            query: "@agent fetch https://example.com".to_string(),
            summoner: "erik".to_string(),
            assigner: "erik".to_string(),
            assignee: "assignee-1".to_string(),
        })
        .await
        .unwrap();

    let tasks_after_plan = persistence.tasks.lock().unwrap().values().cloned().collect::<Vec<_>>();
    assert_eq!(tasks_after_plan.len(), 1);
    assert_eq!(*tasks_after_plan[0].status(), TaskStatus::Pending);
    assert_eq!(tasks_after_plan[0].skills().len(), 1);

    let approval_log = persistence
        .logs
        .lock()
        .unwrap()
        .values()
        .find(|l| *l.kind() == conductor_core::PlanLogType::ApprovalRequested)
        .cloned()
        .expect("approval log must exist");

    execution.perform(*approval_log.id()).await.unwrap();

    let plan = persistence.plans.lock().unwrap().get(&plan_id).cloned().unwrap();
    assert_eq!(*plan.status(), PlanStatus::Success);
    assert_eq!(*plan.progress(), 100);

    let task = persistence.tasks.lock().unwrap().values().next().cloned().unwrap();
    assert_eq!(*task.status(), TaskStatus::Success);

    assert!(transport.sent.lock().unwrap().len() >= 2);
}

/// A consumed approval cannot be replayed.
#[tokio::test]
async fn perform_is_not_replayable() {
    let persistence = Arc::new(FakePersistence::default().with_user("assignee-1", "assistant"));
    let transport = Arc::new(FakeTransport::default());
    let llm = Arc::new(FakeLlm::queue(vec![
        text_response(r#"{"plan_name": "Fetch", "plan_overview": "fetch it", "plan": {"step_1": {"name": "fetch", "assignee": "http", "explanation": "get it", "expected_result": "body"}}}"#),
        tool_call_response("get", serde_json::json!({"url": "https://example.com"})),
        text_response("done"),
    ]));
    let tools = Arc::new(FakeTools);
    let mut server_map = HashMap::new();
    server_map.insert("http".to_string(), server_with_tool("http", "get"));
    let servers = Arc::new(server_map);

    let execution = Arc::new(ExecutionEngine::new(persistence.clone(), transport.clone(), llm.clone(), tools, servers.clone()));
    let planner = conductor_engine::Planner::new(persistence.clone(), transport.clone(), llm, servers, execution.clone());

    planner
        .create_plan(PlanRequest {
            room_id: "room-1".to_string(),
            query: "@agent fetch it".to_string(),
            summoner: "erik".to_string(),
            assigner: "erik".to_string(),
            assignee: "assignee-1".to_string(),
        })
        .await
        .unwrap();

    let approval_log_id = *persistence
        .logs
        .lock()
        .unwrap()
        .values()
        .find(|l| *l.kind() == conductor_core::PlanLogType::ApprovalRequested)
        .unwrap()
        .id();

    execution.perform(approval_log_id).await.unwrap();
    let second = execution.perform(approval_log_id).await;
    assert!(second.is_err());
}

/// S6: when the admin LLM's first tool call is `idle`, nothing is created or sent.
#[tokio::test]
async fn admin_idle_is_a_pure_no_op() {
    let persistence = Arc::new(FakePersistence::default().with_user("owner-1", "owner"));
    let transport = Arc::new(FakeTransport::default());
    let llm = Arc::new(FakeLlm::queue(vec![tool_call_response("idle", serde_json::json!({}))]));
    let tools = Arc::new(FakeTools);
    let mut server_map = HashMap::new();
    server_map.insert("admin".to_string(), server_with_tool("admin", "kick_user"));
    let servers = Arc::new(server_map);

    let execution = Arc::new(ExecutionEngine::new(persistence.clone(), transport.clone(), llm.clone(), tools, servers.clone()));
    let admin = AdminHandler::new(persistence.clone(), transport.clone(), llm, servers, execution);

    admin
        .ask_admin(OwnerMessage {
            room_id: "room-1".to_string(),
            owner_id: "owner-1".to_string(),
            owner_message: "nothing to do right now".to_string(),
            trust: false,
        })
        .await
        .unwrap();

    assert!(persistence.tasks.lock().unwrap().is_empty());
    assert!(persistence.skills.lock().unwrap().is_empty());
    assert!(transport.sent.lock().unwrap().is_empty());
}

/// Trusted admin actions execute immediately, bypassing the approval registry.
#[tokio::test]
async fn trusted_admin_action_executes_without_approval() {
    let persistence = Arc::new(FakePersistence::default().with_user("owner-1", "owner"));
    let transport = Arc::new(FakeTransport::default());
    let llm = Arc::new(FakeLlm::queue(vec![tool_call_response("kick_user", serde_json::json!({"user_id": "u2"}))]));
    let tools = Arc::new(FakeTools);
    let mut server_map = HashMap::new();
    server_map.insert("admin".to_string(), server_with_tool("admin", "kick_user"));
    let servers = Arc::new(server_map);

    let execution = Arc::new(ExecutionEngine::new(persistence.clone(), transport.clone(), llm.clone(), tools, servers.clone()));
    let admin = AdminHandler::new(persistence.clone(), transport.clone(), llm, servers, execution);

    admin
        .ask_admin(OwnerMessage {
            room_id: "room-1".to_string(),
            owner_id: "owner-1".to_string(),
            owner_message: "kick u2".to_string(),
            trust: true,
        })
        .await
        .unwrap();

    let task = persistence.tasks.lock().unwrap().values().next().cloned().expect("task created");
    assert_eq!(*task.status(), TaskStatus::Success);
    assert!(persistence.logs.lock().unwrap().values().all(|l| *l.kind() != conductor_core::PlanLogType::ApprovalRequested));
}
