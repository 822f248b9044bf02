//! Approval & Execution Engine: `perform` and the task/plan advance state
//! machine (spec.md §4.8).

use crate::format::{format_conversation_reverse, format_step_logs};
use crate::messages::{approval_requested, plan_completed, to_chat_message};
use crate::prompts::{self, SKILL_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT};
use conductor_core::{
    GenerateRequest, Input, MCPServer, Message, Output, Plan, PlanLog, PlanLogType, Role, Skill, Task, TaskStatus,
};
use conductor_error::{EngineError, EngineErrorKind, EngineResult};
use conductor_interface::{ChatTransport, LlmChatBackend, PersistenceBackend, ToolCallOutcome, ToolInvoker};
use conductor_llm::enrich_args;
use conductor_security::ApprovalRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Recent-history window used to build skill-synthesis background context.
const RECENT_MESSAGE_LIMIT: usize = 100;

pub struct ExecutionEngine {
    persistence: Arc<dyn PersistenceBackend>,
    transport: Arc<dyn ChatTransport>,
    llm: Arc<dyn LlmChatBackend>,
    tools: Arc<dyn ToolInvoker>,
    servers: Arc<HashMap<String, MCPServer>>,
    approvals: Mutex<ApprovalRegistry>,
}

impl ExecutionEngine {
    pub fn new(
        persistence: Arc<dyn PersistenceBackend>,
        transport: Arc<dyn ChatTransport>,
        llm: Arc<dyn LlmChatBackend>,
        tools: Arc<dyn ToolInvoker>,
        servers: Arc<HashMap<String, MCPServer>>,
    ) -> Self {
        Self {
            persistence,
            transport,
            llm,
            tools,
            servers,
            approvals: Mutex::new(ApprovalRegistry::new()),
        }
    }

    /// Register a freshly written `approval_requested` log as awaiting `perform`.
    pub async fn register_approval(&self, log_id: Uuid, task_id: Uuid) {
        self.approvals.lock().await.register(log_id, task_id);
    }

    /// Entry point for `POST /api/perform`: consume the approval idempotently,
    /// then execute the referenced task's skills.
    #[instrument(skip(self))]
    pub async fn perform(&self, log_id: Uuid) -> EngineResult<()> {
        let task_id = self.approvals.lock().await.consume(log_id)?;
        self.execute_task_now(task_id).await
    }

    /// Execute a task's skills directly, bypassing the approval registry.
    /// Used by `perform` and by the Admin Handler's `trust = true` fast path
    /// (spec.md §4.7 step 5, DESIGN.md Open-question (b)).
    #[instrument(skip(self))]
    pub async fn execute_task_now(&self, task_id: Uuid) -> EngineResult<()> {
        let task = self.persistence.get_task(task_id).await?;
        self.execute_task(task).await
    }

    /// Kick off (or re-check) a plan's next step: used by the Planner right
    /// after it creates a plan's tasks, since those tasks carry no skills of
    /// their own yet and nothing else would otherwise synthesize the first
    /// one's skills and open its approval (spec.md §4.8 has no bootstrap step
    /// of its own; this reuses the same advance logic step 8 describes).
    #[instrument(skip(self))]
    pub async fn advance(&self, plan_id: Uuid) -> EngineResult<()> {
        let plan = self.persistence.get_plan_by_id(plan_id).await?;
        let tasks = self.persistence.get_tasks(plan_id).await?;
        if *plan.progress() == 100 {
            self.complete_plan(&plan).await
        } else {
            self.advance_to_next_task(&plan, &tasks).await
        }
    }

    async fn execute_task(&self, mut task: Task) -> EngineResult<()> {
        task.start();
        self.persistence.update_task(&task).await?;

        let mut skills = Vec::with_capacity(task.skills().len());
        for id in task.skills() {
            skills.push(self.persistence.get_skill(*id).await?);
        }

        for skill in &skills {
            let log = PlanLog::new(
                *task.plan_id(),
                Some(*task.id()),
                Some(*skill.id()),
                PlanLogType::PerformingSkill,
                format!("Performing {}", skill.name()),
            );
            self.persistence.create_plan_log(&log).await?;
        }

        let outcomes = futures::future::join_all(skills.iter().map(|skill| self.invoke_skill(skill))).await;

        let mut all_succeeded = true;
        for (skill, outcome) in skills.iter().zip(outcomes.into_iter()) {
            if outcome.is_error {
                all_succeeded = false;
            }
            let log = PlanLog::new(
                *task.plan_id(),
                Some(*task.id()),
                Some(*skill.id()),
                PlanLogType::SkillExecuted,
                outcome.content.join("\n"),
            );
            self.persistence.create_plan_log(&log).await?;
        }

        task.finish(all_succeeded);
        self.persistence.update_task(&task).await?;

        let mut plan = self.persistence.get_plan_by_id(*task.plan_id()).await?;
        let tasks = self.persistence.get_tasks(*plan.id()).await?;
        plan.recompute_progress(&tasks);
        self.persistence.update_plan(&plan).await?;

        if *plan.progress() == 100 {
            self.complete_plan(&plan).await
        } else {
            self.advance_to_next_task(&plan, &tasks).await
        }
    }

    async fn invoke_skill(&self, skill: &Skill) -> ToolCallOutcome {
        match self.tools.call_tool(skill.mcp_server(), skill.name(), skill.bare_args()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(skill = %skill.name(), error = %e, "tool invocation failed");
                ToolCallOutcome {
                    content: vec![e.to_string()],
                    is_error: true,
                }
            }
        }
    }

    /// Step 7: plan reached 100% progress. Summarize and close it out.
    async fn complete_plan(&self, plan: &Plan) -> EngineResult<()> {
        let mut logs = self.persistence.get_plan_logs(*plan.id()).await?;
        logs.sort_by_key(|l| *l.created_at());
        let formatted = format_step_logs(&logs);

        let gen_request = summary_request(plan.plan_name(), plan.plan_overview(), &formatted);
        let response = self.llm.chat(&gen_request, &[], "auto").await?;
        let summary = response_text(&response.outputs);

        let log = PlanLog::new(*plan.id(), None, None, PlanLogType::PlanCompleted, summary.clone());
        self.persistence.create_plan_log(&log).await?;

        let assignee = self.persistence.get_user_by_id(plan.assignee()).await?;
        let message = to_chat_message(plan.room_id(), &assignee, plan_completed(plan.plan_name(), &summary));
        self.transport.send_message(message).await?;

        info!(plan_id = %plan.id(), "plan completed");
        Ok(())
    }

    /// Step 8: progress < 100. Synthesize skills for the next `not_started`
    /// task and open a fresh approval on it.
    async fn advance_to_next_task(&self, plan: &Plan, tasks: &[Task]) -> EngineResult<()> {
        let Some(next) = tasks
            .iter()
            .filter(|t| *t.status() == TaskStatus::NotStarted)
            .min_by_key(|t| *t.step_number())
        else {
            warn!(plan_id = %plan.id(), "progress below 100 but no not_started task remains");
            return Ok(());
        };

        let server = self
            .servers
            .get(next.mcp_server())
            .ok_or_else(|| EngineError::new(EngineErrorKind::UnknownServer(next.mcp_server().to_string())))?;

        let history = self.persistence.get_messages(plan.room_id(), RECENT_MESSAGE_LIMIT).await?;
        let mut logs = self.persistence.get_plan_logs(*plan.id()).await?;
        logs.sort_by_key(|l| *l.created_at());

        let background = format!(
            "Conversation (most recent first)\n{}\n\nPrior steps\n{}",
            format_conversation_reverse(&history),
            format_step_logs(&logs)
        );

        let user_prompt = prompts::skill_user_prompt(next.task_name(), next.task_explanation(), next.expected_result(), &background);
        let tools = conductor_mcp::function_descriptors(server);
        let gen_request = GenerateRequest {
            messages: vec![
                Message {
                    role: Role::System,
                    content: vec![Input::Text(SKILL_SYSTEM_PROMPT.to_string())],
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

        let response = self.llm.chat(&gen_request, &tools, "required").await?;
        let calls = response
            .outputs
            .into_iter()
            .find_map(|o| match o {
                Output::ToolCalls(calls) => Some(calls),
                _ => None,
            })
            .unwrap_or_default();

        let mut next = next.clone();
        let mut skill_ids = Vec::with_capacity(calls.len());
        for call in &calls {
            let raw_args = call.arguments.as_object().cloned().unwrap_or_default();
            let args = enrich_args(server, &call.name, &raw_args);
            let description = server.tool(&call.name).map(|t| t.description().to_string()).unwrap_or_default();
            let skill = Skill::new(&call.name, next.mcp_server(), description, args);
            self.persistence.create_skill(&skill).await?;
            skill_ids.push(*skill.id());
        }

        next.assign_skills(skill_ids);
        self.persistence.update_task(&next).await?;

        let log = PlanLog::new(
            *plan.id(),
            Some(*next.id()),
            None,
            PlanLogType::ApprovalRequested,
            format!("Approval needed for step {}: {}", next.step_number(), next.task_name()),
        );
        self.persistence.create_plan_log(&log).await?;
        self.register_approval(*log.id(), *next.id()).await;

        let assignee = self.persistence.get_user_by_id(plan.assignee()).await?;
        let summary = format!("step {}: {}", next.step_number(), next.task_name());
        let message = to_chat_message(plan.room_id(), &assignee, approval_requested(&summary, *log.id()));
        self.transport.send_message(message).await?;

        Ok(())
    }
}

fn summary_request(plan_name: &str, plan_overview: &str, logs: &str) -> GenerateRequest {
    GenerateRequest {
        messages: vec![
            Message {
                role: Role::System,
                content: vec![Input::Text(SUMMARY_SYSTEM_PROMPT.to_string())],
            },
            Message {
                role: Role::User,
                content: vec![Input::Text(prompts::summary_user_prompt(plan_name, plan_overview, logs))],
            },
        ],
        max_tokens: None,
        temperature: Some(0.3),
        model: None,
    }
}

fn response_text(outputs: &[Output]) -> String {
    outputs
        .iter()
        .find_map(|o| match o {
            Output::Text(t) => Some(t.clone()),
            _ => None,
        })
        .unwrap_or_default()
}
