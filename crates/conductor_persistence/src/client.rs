//! HTTP-backed [`PersistenceBackend`] implementation.

use crate::envelope::{LogEnvelope, PlanEnvelope, SkillEnvelope, TaskEnvelope, UserEnvelope, UsersEnvelope};
use async_trait::async_trait;
use conductor_core::{Plan, PlanLog, Skill, Task};
use conductor_error::{PersistenceError, PersistenceErrorKind, PersistenceResult};
use conductor_interface::{ChatMessage, PersistenceBackend, User};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// `reqwest`-backed client for the orchestrator's persistence REST service
/// (spec.md §4.5, §6).
#[derive(Debug, Clone)]
pub struct HttpPersistenceClient {
    client: Client,
    base_url: String,
}

impl HttpPersistenceClient {
    /// Construct a client pointed at `base_url` (the `CLIENT_URL` setting).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn send(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> PersistenceResult<Response> {
        let url = format!("{}/api/{}", self.base_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            error!(%url, error = ?e, "persistence request failed");
            PersistenceError::new(PersistenceErrorKind::Request(e.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%url, %status, %body, "persistence service returned an error");
            return Err(PersistenceError::new(PersistenceErrorKind::Api {
                status: status.as_u16(),
                body,
            }));
        }
        Ok(response)
    }

    async fn get_decoded<T: DeserializeOwned>(&self, path: &str) -> PersistenceResult<T> {
        let response = self.send(Method::GET, path, None).await?;
        decode(response).await
    }

    async fn post_decoded<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> PersistenceResult<T> {
        let response = self.send(Method::POST, path, Some(serde_json::to_value(body).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Decode(e.to_string()))
        })?)).await?;
        decode(response).await
    }

    async fn post_unit<B: Serialize + Sync>(&self, path: &str, body: &B) -> PersistenceResult<()> {
        let value = serde_json::to_value(body)
            .map_err(|e| PersistenceError::new(PersistenceErrorKind::Decode(e.to_string())))?;
        self.send(Method::POST, path, Some(value)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> PersistenceResult<T> {
    response
        .json()
        .await
        .map_err(|e| PersistenceError::new(PersistenceErrorKind::Decode(e.to_string())))
}

#[async_trait]
impl PersistenceBackend for HttpPersistenceClient {
    #[instrument(skip(self))]
    async fn get_messages(&self, room_id: &str, limit: usize) -> PersistenceResult<Vec<ChatMessage>> {
        let messages: Vec<ChatMessage> = self
            .post_decoded("chat/get_messages", &json!({"roomId": room_id, "limit": limit}))
            .await?;
        debug!(count = messages.len(), "fetched room messages");
        Ok(messages)
    }

    async fn get_user_by_id(&self, id: &str) -> PersistenceResult<User> {
        let envelope: UserEnvelope<User> = self
            .get_decoded(&format!("user/get_user_by_id?id={id}"))
            .await?;
        Ok(envelope.user)
    }

    async fn get_user_by_username(&self, username: &str) -> PersistenceResult<User> {
        let envelope: UserEnvelope<User> = self
            .get_decoded(&format!("user/get_user_by_username?username={username}"))
            .await?;
        Ok(envelope.user)
    }

    async fn get_users(&self, room_id: &str) -> PersistenceResult<Vec<User>> {
        let envelope: UsersEnvelope<User> = self
            .get_decoded(&format!("user/get_users?roomId={room_id}"))
            .await?;
        Ok(envelope.users)
    }

    async fn create_plan(&self, plan: &Plan) -> PersistenceResult<()> {
        self.post_unit("plan/create_plan", plan).await
    }

    async fn update_plan(&self, plan: &Plan) -> PersistenceResult<()> {
        self.post_unit("plan/update_plan", plan).await
    }

    async fn get_plan_by_id(&self, id: Uuid) -> PersistenceResult<Plan> {
        let envelope: PlanEnvelope<Plan> = self
            .get_decoded(&format!("plan/get_plan_by_id?id={id}"))
            .await?;
        Ok(envelope.plan)
    }

    async fn create_tasks(&self, tasks: &[Task]) -> PersistenceResult<()> {
        self.post_unit("plan/create_tasks", &json!({"tasks": tasks})).await
    }

    async fn get_tasks(&self, plan_id: Uuid) -> PersistenceResult<Vec<Task>> {
        self.get_decoded(&format!("plan/get_tasks?planId={plan_id}")).await
    }

    async fn get_task(&self, id: Uuid) -> PersistenceResult<Task> {
        let envelope: TaskEnvelope<Task> = self
            .get_decoded(&format!("plan/get_task?id={id}"))
            .await?;
        Ok(envelope.task)
    }

    async fn update_task(&self, task: &Task) -> PersistenceResult<()> {
        self.post_unit("plan/update_task", task).await
    }

    async fn create_plan_log(&self, log: &PlanLog) -> PersistenceResult<()> {
        self.post_unit("plan/create_plan_log", log).await
    }

    async fn get_plan_log(&self, id: Uuid) -> PersistenceResult<PlanLog> {
        let envelope: LogEnvelope<PlanLog> = self
            .get_decoded(&format!("plan/get_plan_log?id={id}"))
            .await?;
        Ok(envelope.log)
    }

    async fn get_plan_logs(&self, plan_id: Uuid) -> PersistenceResult<Vec<PlanLog>> {
        self.get_decoded(&format!("plan/get_plan_logs?planId={plan_id}")).await
    }

    async fn create_skill(&self, skill: &Skill) -> PersistenceResult<()> {
        self.post_unit("skill/create_skill", skill).await
    }

    async fn get_skill(&self, id: Uuid) -> PersistenceResult<Skill> {
        let envelope: SkillEnvelope<Skill> = self
            .get_decoded(&format!("skill/get_skill?id={id}"))
            .await?;
        Ok(envelope.skill)
    }
}
