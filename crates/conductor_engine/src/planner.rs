//! Planner: synthesizes a [`Plan`] and its [`Task`]s from a conversation
//! (spec.md §4.6).

use crate::execution::ExecutionEngine;
use crate::format::{render_messages, strip_agent_mention, to_conversation};
use crate::messages::{plan_created, to_chat_message};
use crate::prompts::{self, PLAN_SYSTEM_PROMPT};
use crate::types::PlanRequest;
use conductor_core::{GenerateRequest, Input, MCPServer, Message, Plan, PlanContext, PlanLog, PlanLogType, Role, Task};
use conductor_error::EngineResult;
use conductor_interface::{ChatTransport, LlmChatBackend, PersistenceBackend};
use conductor_llm::{ExtractedPlan, extract_plan};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Recent-history window fetched before synthesizing a plan (spec.md §4.6 step 1).
const RECENT_MESSAGE_LIMIT: usize = 100;

pub struct Planner {
    persistence: Arc<dyn PersistenceBackend>,
    transport: Arc<dyn ChatTransport>,
    llm: Arc<dyn LlmChatBackend>,
    servers: Arc<HashMap<String, MCPServer>>,
    execution: Arc<ExecutionEngine>,
}

impl Planner {
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

    /// Run the full Planner flow for one summoning, returning the created
    /// plan's id.
    #[instrument(skip(self, request), fields(room_id = %request.room_id))]
    pub async fn create_plan(&self, request: PlanRequest) -> EngineResult<uuid::Uuid> {
        let history = self.persistence.get_messages(&request.room_id, RECENT_MESSAGE_LIMIT).await?;
        let query = strip_agent_mention(&request.query);
        let conversation = to_conversation(&history, Some(&query));

        let now = chrono::Utc::now().to_rfc3339();
        let user_prompt = prompts::plan_user_prompt(&render_messages(&conversation), &now, &self.servers);

        let gen_request = GenerateRequest {
            messages: vec![
                Message {
                    role: Role::System,
                    content: vec![Input::Text(PLAN_SYSTEM_PROMPT.to_string())],
                },
                Message {
                    role: Role::User,
                    content: vec![Input::Text(user_prompt)],
                },
            ],
            max_tokens: None,
            temperature: Some(0.7),
            model: None,
        };

        let response = self.llm.chat(&gen_request, &[], "auto").await?;
        let text = response_text(&response.outputs);
        let extracted = extract_plan(&text);

        let conversations_json = serde_json::to_value(&conversation).unwrap_or(Value::Array(Vec::new()));
        let (plan_name, plan_overview, plan_value, no_skills_needed) = match &extracted {
            ExtractedPlan::Plan(value) => (
                value
                    .get("plan_name")
                    .and_then(Value::as_str)
                    .unwrap_or("No plan name provided")
                    .to_string(),
                value
                    .get("plan_overview")
                    .and_then(Value::as_str)
                    .unwrap_or("No plan overview provided")
                    .to_string(),
                value.clone(),
                false,
            ),
            ExtractedPlan::NoSkillsNeeded => (
                "null_plan".to_string(),
                "No tools are needed for this request.".to_string(),
                Value::Object(Default::default()),
                true,
            ),
            ExtractedPlan::Unparseable => {
                info!("planner LLM response had no parseable plan; treating as no-op");
                (
                    "null_plan".to_string(),
                    "No plan could be synthesized from the response.".to_string(),
                    Value::Object(Default::default()),
                    true,
                )
            }
        };

        let context = PlanContext::new(plan_value.clone(), conversations_json, query);
        let mut plan = Plan::new(
            &request.room_id,
            &plan_name,
            &plan_overview,
            &request.assigner,
            &request.assignee,
            context,
        );

        if no_skills_needed {
            plan.mark_no_skills_needed();
        }
        self.persistence.create_plan(&plan).await?;

        let created_log = PlanLog::new(
            *plan.id(),
            None,
            None,
            PlanLogType::PlanCreated,
            format!("Plan **{plan_name}** has been created"),
        );
        self.persistence.create_plan_log(&created_log).await?;

        let assignee = self.persistence.get_user_by_id(&request.assignee).await?;
        let message = to_chat_message(&request.room_id, &assignee, plan_created(&plan_name, *plan.id(), &plan_overview));
        self.transport.send_message(message).await?;

        if no_skills_needed {
            return Ok(*plan.id());
        }

        let tasks = derive_tasks(*plan.id(), &plan_value);
        if tasks.is_empty() {
            plan.mark_no_skills_needed();
            self.persistence.update_plan(&plan).await?;
        } else {
            self.persistence.create_tasks(&tasks).await?;
            self.execution.advance(*plan.id()).await?;
        }

        Ok(*plan.id())
    }
}

fn response_text(outputs: &[conductor_core::Output]) -> String {
    outputs
        .iter()
        .find_map(|o| match o {
            conductor_core::Output::Text(t) => Some(t.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Derive [`Task`]s from a plan JSON's `plan: {step_1: {...}, ...}` object,
/// skipping steps with no (or `"none"`) assignee, and falling back to a
/// single minimal task when every step was skipped (spec.md §4.6 "Task
/// derivation"; supplemented from the original's minimal-task fallback).
fn derive_tasks(plan_id: uuid::Uuid, plan_value: &Value) -> Vec<Task> {
    let steps = match plan_value.get("plan").and_then(Value::as_object) {
        Some(steps) if !steps.is_empty() => steps,
        _ => return Vec::new(),
    };

    let mut keys: Vec<&String> = steps.keys().collect();
    keys.sort();

    let mut tasks = Vec::new();
    for (i, key) in keys.into_iter().enumerate() {
        let step = &steps[key];
        let assignee = step.get("assignee").and_then(Value::as_str).unwrap_or("");
        if assignee.is_empty() || assignee.eq_ignore_ascii_case("none") {
            continue;
        }

        let task = Task::new(
            plan_id,
            (i + 1) as u32,
            step.get("name").and_then(Value::as_str).unwrap_or("Step"),
            step.get("explanation").and_then(Value::as_str).unwrap_or(""),
            step.get("expected_result").and_then(Value::as_str).unwrap_or(""),
            assignee,
        );
        tasks.push(task);
    }

    if tasks.is_empty() {
        tasks.push(Task::new(plan_id, 1, "Execute request", "", "", ""));
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn steps_with_none_assignee_are_skipped() {
        let plan_id = uuid::Uuid::new_v4();
        let plan = json!({
            "plan": {
                "step_1": {"name": "a", "assignee": "none", "explanation": "", "expected_result": ""},
                "step_2": {"name": "b", "assignee": "fs", "explanation": "", "expected_result": ""},
            }
        });
        let tasks = derive_tasks(plan_id, &plan);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_name(), "b");
        // step_number tracks the sorted key's enumerate index (including the
        // skipped step_1), matching the original's `i + 1` semantics.
        assert_eq!(tasks[0].step_number(), &2);
    }

    #[test]
    fn all_steps_skipped_falls_back_to_minimal_task() {
        let plan_id = uuid::Uuid::new_v4();
        let plan = json!({
            "plan": {
                "step_1": {"name": "a", "assignee": "none", "explanation": "", "expected_result": ""},
            }
        });
        let tasks = derive_tasks(plan_id, &plan);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_name(), "Execute request");
        assert!(tasks[0].skills().is_empty());
    }

    #[test]
    fn steps_are_ordered_by_sorted_key() {
        let plan_id = uuid::Uuid::new_v4();
        let plan = json!({
            "plan": {
                "step_2": {"name": "second", "assignee": "fs", "explanation": "", "expected_result": ""},
                "step_1": {"name": "first", "assignee": "fs", "explanation": "", "expected_result": ""},
            }
        });
        let tasks = derive_tasks(plan_id, &plan);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_name(), "first");
        assert_eq!(tasks[1].task_name(), "second");
    }

    #[test]
    fn missing_plan_object_yields_no_tasks() {
        let plan_id = uuid::Uuid::new_v4();
        let tasks = derive_tasks(plan_id, &json!({}));
        assert!(tasks.is_empty());
    }
}
