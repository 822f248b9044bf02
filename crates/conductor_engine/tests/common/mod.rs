//! In-memory fakes for the engine's four trait seams, shared by every
//! integration test file under `tests/`.

use async_trait::async_trait;
use conductor_core::{GenerateResponse, Plan, PlanLog, Skill, Task};
use conductor_error::{LlmResult, McpResult, PersistenceError, PersistenceErrorKind, PersistenceResult, SocketResult};
use conductor_interface::{ChatMessage, ChatTransport, LlmChatBackend, PersistenceBackend, ToolCallOutcome, ToolInvoker, User};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct FakePersistence {
    pub messages: Mutex<Vec<ChatMessage>>,
    pub users: Mutex<HashMap<String, User>>,
    pub plans: Mutex<HashMap<Uuid, Plan>>,
    pub tasks: Mutex<HashMap<Uuid, Task>>,
    pub skills: Mutex<HashMap<Uuid, Skill>>,
    pub logs: Mutex<HashMap<Uuid, PlanLog>>,
}

impl FakePersistence {
    pub fn with_user(self, id: &str, username: &str) -> Self {
        self.users.lock().unwrap().insert(
            id.to_string(),
            User {
                id: id.to_string(),
                username: username.to_string(),
                avatar: None,
            },
        );
        self
    }
}

#[async_trait]
impl PersistenceBackend for FakePersistence {
    async fn get_messages(&self, _room_id: &str, _limit: usize) -> PersistenceResult<Vec<ChatMessage>> {
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn get_user_by_id(&self, id: &str) -> PersistenceResult<User> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or(User { id: id.to_string(), username: id.to_string(), avatar: None }))
    }

    async fn get_user_by_username(&self, username: &str) -> PersistenceResult<User> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned()
            .unwrap_or(User { id: username.to_string(), username: username.to_string(), avatar: None }))
    }

    async fn get_users(&self, _room_id: &str) -> PersistenceResult<Vec<User>> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
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

    async fn create_tasks(&self, tasks: &[Task]) -> PersistenceResult<()> {
        let mut store = self.tasks.lock().unwrap();
        for task in tasks {
            store.insert(*task.id(), task.clone());
        }
        Ok(())
    }

    async fn get_tasks(&self, plan_id: Uuid) -> PersistenceResult<Vec<Task>> {
        Ok(self.tasks.lock().unwrap().values().filter(|t| *t.plan_id() == plan_id).cloned().collect())
    }

    async fn get_task(&self, id: Uuid) -> PersistenceResult<Task> {
        self.tasks
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| PersistenceError::new(PersistenceErrorKind::NotFound { kind: "task", id: id.to_string() }))
    }

    async fn update_task(&self, task: &Task) -> PersistenceResult<()> {
        self.tasks.lock().unwrap().insert(*task.id(), task.clone());
        Ok(())
    }

    async fn create_plan_log(&self, log: &PlanLog) -> PersistenceResult<()> {
        self.logs.lock().unwrap().insert(*log.id(), log.clone());
        Ok(())
    }

    async fn get_plan_log(&self, id: Uuid) -> PersistenceResult<PlanLog> {
        Ok(self.logs.lock().unwrap().get(&id).cloned().expect("log must exist"))
    }

    async fn get_plan_logs(&self, plan_id: Uuid) -> PersistenceResult<Vec<PlanLog>> {
        Ok(self.logs.lock().unwrap().values().filter(|l| *l.plan_id() == plan_id).cloned().collect())
    }

    async fn create_skill(&self, skill: &Skill) -> PersistenceResult<()> {
        self.skills.lock().unwrap().insert(*skill.id(), skill.clone());
        Ok(())
    }

    async fn get_skill(&self, id: Uuid) -> PersistenceResult<Skill> {
        self.skills
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| PersistenceError::new(PersistenceErrorKind::NotFound { kind: "skill", id: id.to_string() }))
    }
}

#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<ChatMessage>>,
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn send_message(&self, msg: ChatMessage) -> SocketResult<()> {
        self.sent.lock().unwrap().push(msg);
        Ok(())
    }

    async fn join_room(&self, _room_id: &str) -> SocketResult<()> {
        Ok(())
    }

    async fn quit_room(&self, _room_id: &str) -> SocketResult<()> {
        Ok(())
    }
}

/// Replays a fixed queue of canned responses, one per `chat` call.
#[derive(Default)]
pub struct FakeLlm {
    pub responses: Mutex<VecDeque<GenerateResponse>>,
}

impl FakeLlm {
    pub fn queue(responses: Vec<GenerateResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl LlmChatBackend for FakeLlm {
    async fn chat(
        &self,
        _request: &conductor_core::GenerateRequest,
        _tools: &[serde_json::Value],
        _tool_choice: &str,
    ) -> LlmResult<GenerateResponse> {
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(GenerateResponse { outputs: vec![] }))
    }
}

/// Always reports a clean, non-error tool result.
#[derive(Default)]
pub struct FakeTools;

#[async_trait]
impl ToolInvoker for FakeTools {
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

pub fn server_with_tool(name: &str, tool: &str) -> conductor_core::MCPServer {
    conductor_core::MCPServer::new(
        name,
        format!("{name} server"),
        vec![conductor_core::MCPTool::new(tool, format!("runs {tool}"), serde_json::json!({"type": "object", "properties": {}}))],
    )
}
