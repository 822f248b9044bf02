//! Trait seam for the external persistence REST service.

use async_trait::async_trait;
use conductor_core::{Plan, PlanLog, Skill, Task};
use conductor_error::PersistenceResult;
use uuid::Uuid;

/// A chat message as stored by the persistence service (spec.md §6).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub sender: String,
    pub content: String,
    pub avatar: Option<String>,
    pub room_id: String,
    #[serde(default)]
    pub mentions: Vec<String>,
}

/// A persistence-service user record, used for avatar/sender payloads.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

/// Typed wrapper over the external REST persistence API (spec.md §4.5, §6).
///
/// `conductor_engine` depends only on this trait, never on a concrete HTTP client,
/// so its tests can substitute an in-memory fake.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Fetch up to `limit` most recent messages for a room, oldest first.
    async fn get_messages(&self, room_id: &str, limit: usize) -> PersistenceResult<Vec<ChatMessage>>;

    async fn get_user_by_id(&self, id: &str) -> PersistenceResult<User>;
    async fn get_user_by_username(&self, username: &str) -> PersistenceResult<User>;
    async fn get_users(&self, room_id: &str) -> PersistenceResult<Vec<User>>;

    async fn create_plan(&self, plan: &Plan) -> PersistenceResult<()>;
    async fn update_plan(&self, plan: &Plan) -> PersistenceResult<()>;
    async fn get_plan_by_id(&self, id: Uuid) -> PersistenceResult<Plan>;

    async fn create_tasks(&self, tasks: &[Task]) -> PersistenceResult<()>;
    async fn get_tasks(&self, plan_id: Uuid) -> PersistenceResult<Vec<Task>>;
    async fn get_task(&self, id: Uuid) -> PersistenceResult<Task>;
    async fn update_task(&self, task: &Task) -> PersistenceResult<()>;

    /// The mechanism both for audit and for exposing approvable actions to the UI
    /// (spec.md §4.5) — callers must not skip this even for internal bookkeeping.
    async fn create_plan_log(&self, log: &PlanLog) -> PersistenceResult<()>;
    async fn get_plan_log(&self, id: Uuid) -> PersistenceResult<PlanLog>;
    /// All logs for a plan, for the plan-completion summary (spec.md §4.8 step 7).
    /// Not in spec.md §6's endpoint table; added because step 7 ("load all plan
    /// logs") has no other way to be satisfied given `PlanLog`'s append-only,
    /// plan-id-keyed shape.
    async fn get_plan_logs(&self, plan_id: Uuid) -> PersistenceResult<Vec<PlanLog>>;

    async fn create_skill(&self, skill: &Skill) -> PersistenceResult<()>;
    async fn get_skill(&self, id: Uuid) -> PersistenceResult<Skill>;
}
