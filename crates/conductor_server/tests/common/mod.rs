//! Minimal in-memory fakes, just enough to build an [`AppState`] for route tests.

use async_trait::async_trait;
use conductor_core::{Plan, PlanLog, Skill, Task};
use conductor_error::{LlmResult, McpResult, PersistenceError, PersistenceErrorKind, PersistenceResult, SocketResult};
use conductor_interface::{ChatMessage, ChatTransport, LlmChatBackend, PersistenceBackend, ToolCallOutcome, ToolInvoker, User};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct NullPersistence {
    pub plans: Mutex<HashMap<Uuid, Plan>>,
}

#[async_trait]
impl PersistenceBackend for NullPersistence {
    async fn get_messages(&self, _room_id: &str, _limit: usize) -> PersistenceResult<Vec<ChatMessage>> {
        Ok(vec![])
    }

    async fn get_user_by_id(&self, id: &str) -> PersistenceResult<User> {
        Ok(User { id: id.to_string(), username: id.to_string(), avatar: None })
    }

    async fn get_user_by_username(&self, username: &str) -> PersistenceResult<User> {
        Ok(User { id: username.to_string(), username: username.to_string(), avatar: None })
    }

    async fn get_users(&self, _room_id: &str) -> PersistenceResult<Vec<User>> {
        Ok(vec![])
    }

    async fn create_plan(&self, plan: &Plan) -> PersistenceResult<()> {
        self.plans.lock().unwrap().insert(*plan.id(), plan.clone());
        Ok(())
    }

    async fn update_plan(&self, plan: &Plan) -> PersistenceResult<()> {
        self.plans.lock().unwrap().insert(*plan.id(), plan.clone());
        Ok(())
    }

    async fn get_plan_by_id(&self, id: Uuid) -> PersistenceResult<Plan> {
        self.plans
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| PersistenceError::new(PersistenceErrorKind::NotFound { kind: "plan", id: id.to_string() }))
    }

    async fn create_tasks(&self, _tasks: &[Task]) -> PersistenceResult<()> {
        Ok(())
    }

    async fn get_tasks(&self, _plan_id: Uuid) -> PersistenceResult<Vec<Task>> {
        Ok(vec![])
    }

    async fn get_task(&self, id: Uuid) -> PersistenceResult<Task> {
        Err(PersistenceError::new(PersistenceErrorKind::NotFound { kind: "task", id: id.to_string() }))
    }

    async fn update_task(&self, _task: &Task) -> PersistenceResult<()> {
        Ok(())
    }

    async fn create_plan_log(&self, _log: &PlanLog) -> PersistenceResult<()> {
        Ok(())
    }

    async fn get_plan_log(&self, id: Uuid) -> PersistenceResult<PlanLog> {
        Err(PersistenceError::new(PersistenceErrorKind::NotFound { kind: "log", id: id.to_string() }))
    }

    async fn get_plan_logs(&self, _plan_id: Uuid) -> PersistenceResult<Vec<PlanLog>> {
        Ok(vec![])
    }

    async fn create_skill(&self, _skill: &Skill) -> PersistenceResult<()> {
        Ok(())
    }

    async fn get_skill(&self, id: Uuid) -> PersistenceResult<Skill> {
        Err(PersistenceError::new(PersistenceErrorKind::NotFound { kind: "skill", id: id.to_string() }))
    }
}

#[derive(Default)]
pub struct NullTransport;

#[async_trait]
impl ChatTransport for NullTransport {
    async fn send_message(&self, _msg: ChatMessage) -> SocketResult<()> {
        Ok(())
    }

    async fn join_room(&self, _room_id: &str) -> SocketResult<()> {
        Ok(())
    }

    async fn quit_room(&self, _room_id: &str) -> SocketResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct NullLlm;

#[async_trait]
impl LlmChatBackend for NullLlm {
    async fn chat(
        &self,
        _request: &conductor_core::GenerateRequest,
        _tools: &[serde_json::Value],
        _tool_choice: &str,
    ) -> LlmResult<conductor_core::GenerateResponse> {
        Ok(conductor_core::GenerateResponse { outputs: vec![] })
    }
}

#[derive(Default)]
pub struct NullTools;

#[async_trait]
impl ToolInvoker for NullTools {
    async fn call_tool(
        &self,
        _server: &str,
        tool: &str,
        _args: HashMap<String, serde_json::Value>,
    ) -> McpResult<ToolCallOutcome> {
        Ok(ToolCallOutcome {
            content: vec![format!("{tool} ok")],
            is_error: false,
        })
    }
}
