//! Admin Handler: carries out one owner-issued administrative instruction
//! per summoning (spec.md §4.7).

use crate::execution::ExecutionEngine;
use crate::format::{format_conversation, format_users};
use crate::messages::{approval_requested, to_chat_message};
use crate::prompts::{self, ADMIN_SYSTEM_PROMPT};
use crate::types::OwnerMessage;
use conductor_core::{GenerateRequest, Input, MCPServer, Message, Output, Plan, PlanContext, PlanLog, PlanLogType, Role, Skill, Task};
use conductor_error::{EngineError, EngineErrorKind, EngineResult};
use conductor_interface::{ChatTransport, LlmChatBackend, PersistenceBackend};
use conductor_llm::enrich_args;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Recent-history window fetched before dispatching to the admin LLM.
const RECENT_MESSAGE_LIMIT: usize = 100;

/// Name of the MCP server that advertises administrative tools. The manifest
/// is expected to register exactly one server under this name.
pub const ADMIN_SERVER_NAME: &str = "admin";

/// Tool-call name that means "nothing to do" and short-circuits with zero
/// side effects (spec.md §4.7 Testable Scenario "Admin idle").
const IDLE_TOOL_NAME: &str = "idle";

pub struct AdminHandler {
    persistence: Arc<dyn PersistenceBackend>,
    transport: Arc<dyn ChatTransport>,
    llm: Arc<dyn LlmChatBackend>,
    servers: Arc<HashMap<String, MCPServer>>,
    execution: Arc<ExecutionEngine>,
}

impl AdminHandler {
    pub fn new(
        persistence: Arc<dyn PersistenceBackend>,
        transport: Arc<dyn ChatTransport>,
        llm: Arc<dyn LlmChatBackend>,
        servers: Arc<HashMap<String, MCPServer>>,
        execution: Arc<ExecutionEngine>,
    ) -> Self {
        Self {
            persistence,
            transport,
            llm,
            servers,
            execution,
        }
    }

    #[instrument(skip(self, msg), fields(room_id = %msg.room_id, trust = msg.trust))]
    pub async fn ask_admin(&self, msg: OwnerMessage) -> EngineResult<()> {
        let admin_server = self
            .servers
            .get(ADMIN_SERVER_NAME)
            .ok_or_else(|| EngineError::new(EngineErrorKind::UnknownServer(ADMIN_SERVER_NAME.to_string())))?;

        let history = self.persistence.get_messages(&msg.room_id, RECENT_MESSAGE_LIMIT).await?;
        let participants = self.persistence.get_users(&msg.room_id).await?;

        let user_prompt = prompts::admin_user_prompt(
            &format_conversation(&history),
            &msg.room_id,
            &format_users(&participants),
            &msg.owner_message,
        );

        let gen_request = GenerateRequest {
            messages: vec![
                Message {
                    role: Role::System,
                    content: vec![Input::Text(ADMIN_SYSTEM_PROMPT.to_string())],
                },
                Message {
                    role: Role::User,
                    content: vec![Input::Text(user_prompt)],
                },
            ],
            max_tokens: None,
            temperature: None,
            model: None,
        };

        let tools = conductor_mcp::function_descriptors(admin_server);
        let response = self.llm.chat(&gen_request, &tools, "required").await?;

        let calls = response.outputs.into_iter().find_map(|o| match o {
            Output::ToolCalls(calls) => Some(calls),
            _ => None,
        });

        let Some(calls) = calls else {
            info!("admin LLM returned no actions");
            return Ok(());
        };
        if calls.is_empty() {
            info!("admin LLM returned no actions");
            return Ok(());
        }
        if calls[0].name == IDLE_TOOL_NAME {
            info!("admin LLM chose to idle");
            return Ok(());
        }

        let mut grouped: HashMap<Uuid, Vec<conductor_core::ToolCall>> = HashMap::new();
        for call in calls {
            let plan_id = resolve_plan_id(&call.arguments);
            grouped.entry(plan_id).or_default().push(call);
        }

        for (plan_id, calls) in grouped {
            // An action may reference an existing plan by id, or carry none at
            // all. When the referenced plan doesn't actually exist yet (the
            // common case: a bare admin instruction with no prior planning
            // step), synthesize a minimal one so the shared execution path's
            // progress bookkeeping has something to update.
            let plan_id = match self.persistence.get_plan_by_id(plan_id).await {
                Ok(plan) => *plan.id(),
                Err(_) => {
                    let plan = Plan::new(
                        &msg.room_id,
                        "Admin action",
                        "Administrative action requested by the room owner",
                        &msg.owner_id,
                        &msg.owner_id,
                        PlanContext::new(Value::Null, Value::Null, msg.owner_message.clone()),
                    );
                    self.persistence.create_plan(&plan).await?;
                    *plan.id()
                }
            };

            for call in calls {
                let server_name = call
                    .arguments
                    .get("mcp_server")
                    .and_then(Value::as_str)
                    .unwrap_or(ADMIN_SERVER_NAME);
                let server = self.servers.get(server_name).unwrap_or(admin_server);

                let raw_args = call.arguments.as_object().cloned().unwrap_or_default();
                let args = enrich_args(server, &call.name, &raw_args);
                let description = server.tool(&call.name).map(|t| t.description().to_string()).unwrap_or_default();
                let skill = Skill::new(&call.name, server.name(), description, args);
                self.persistence.create_skill(&skill).await?;

                let mut task = Task::new(plan_id, 1, &call.name, "", "", server.name());
                task.assign_skills(vec![*skill.id()]);
                self.persistence.create_tasks(std::slice::from_ref(&task)).await?;

                if msg.trust {
                    self.execution.execute_task_now(*task.id()).await?;
                } else {
                    let log = PlanLog::new(
                        plan_id,
                        Some(*task.id()),
                        Some(*skill.id()),
                        PlanLogType::ApprovalRequested,
                        format!("Approval needed to run {}", call.name),
                    );
                    self.persistence.create_plan_log(&log).await?;
                    self.execution.register_approval(*log.id(), *task.id()).await;

                    let owner = self.persistence.get_user_by_id(&msg.owner_id).await?;
                    let message =
                        to_chat_message(&msg.room_id, &owner, approval_requested(&call.name, *log.id()));
                    self.transport.send_message(message).await?;
                }
            }
        }

        Ok(())
    }
}

/// Extract `plan_id` from a tool call's arguments, unwrapping a `{"value": ...}`
/// envelope if present, else minting a fresh id (spec.md §4.7, DESIGN.md
/// Open-question (a): "mint per action when absent").
fn resolve_plan_id(arguments: &Value) -> Uuid {
    let raw = arguments.get("plan_id");
    let candidate = match raw {
        Some(Value::Object(envelope)) => envelope.get("value").and_then(Value::as_str),
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    };
    candidate.and_then(|s| Uuid::parse_str(s).ok()).unwrap_or_else(Uuid::new_v4)
}
