//! Domain entities: Plan, Task, Skill, PlanLog, MCPServer.
//!
//! These are the records the orchestrator reads from and writes to the external
//! persistence service (see `conductor_persistence`). They are plain serde-round-trippable
//! structs; the engine is the only thing that mutates them in memory before a write.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};
use uuid::Uuid;

/// Lifecycle state of a [`Plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Created,
    Running,
    Success,
    Failed,
}

/// Lifecycle state of a [`Task`]. Advances monotonically:
/// `not_started -> pending -> running -> {success, failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    Pending,
    Running,
    Success,
    Failed,
}

/// Kind of an append-only [`PlanLog`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanLogType {
    PlanCreated,
    ApprovalRequested,
    PerformingSkill,
    SkillExecuted,
    TaskCompleted,
    PlanCompleted,
    PlanFailed,
}

/// Opaque context blob carried on a [`Plan`]: the raw LLM plan JSON plus the
/// conversation and query it was synthesized from.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct PlanContext {
    /// Raw `{plan_name, plan_overview, plan: {...}}` JSON returned by the LLM.
    plan: serde_json::Value,
    /// The formatted conversation the plan was synthesized from.
    conversations: serde_json::Value,
    /// The summoning query, with the `@agent` mention stripped.
    query: String,
}

impl PlanContext {
    /// Construct a new context blob.
    pub fn new(plan: serde_json::Value, conversations: serde_json::Value, query: String) -> Self {
        Self {
            plan,
            conversations,
            query,
        }
    }
}

/// One summoning: a multi-step plan synthesized from a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Plan {
    id: Uuid,
    room_id: String,
    plan_name: String,
    plan_overview: String,
    status: PlanStatus,
    /// `progress = floor(|tasks in {success, failed}| / |tasks| * 100)`, never
    /// trusted from a caller — always recomputed by [`Plan::recompute_progress`].
    progress: u8,
    assigner: String,
    assignee: String,
    reviewer: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    context: PlanContext,
}

impl Plan {
    /// Construct a freshly created plan in `Created` status with zero progress.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        room_id: impl Into<String>,
        plan_name: impl Into<String>,
        plan_overview: impl Into<String>,
        assigner: impl Into<String>,
        assignee: impl Into<String>,
        context: PlanContext,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            room_id: room_id.into(),
            plan_name: plan_name.into(),
            plan_overview: plan_overview.into(),
            status: PlanStatus::Created,
            progress: 0,
            assigner: assigner.into(),
            assignee: assignee.into(),
            reviewer: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            context,
        }
    }

    /// Recompute `progress` from the given tasks and update `status` per the
    /// invariant `progress == 100 <=> status in {success, failed}`.
    ///
    /// Status resolution when `progress` reaches 100: `failed` wins over `success`
    /// if any task failed.
    pub fn recompute_progress(&mut self, tasks: &[Task]) {
        let total = tasks.len();
        let done = tasks
            .iter()
            .filter(|t| matches!(t.status, TaskStatus::Success | TaskStatus::Failed))
            .count();

        self.progress = if total == 0 {
            100
        } else {
            ((done * 100) / total) as u8
        };

        self.status = if self.progress < 100 {
            PlanStatus::Running
        } else if tasks.iter().any(|t| t.status == TaskStatus::Failed) {
            PlanStatus::Failed
        } else {
            PlanStatus::Success
        };

        self.updated_at = Utc::now();
        if self.progress == 100 {
            self.completed_at = Some(self.updated_at);
        }
    }

    /// Mark the plan as needing no tools: the LLM returned an empty, `null_plan`,
    /// or `no_skills_needed` plan.
    pub fn mark_no_skills_needed(&mut self) {
        self.status = PlanStatus::Success;
        self.progress = 100;
        let now = Utc::now();
        self.updated_at = now;
        self.completed_at = Some(now);
    }
}

/// One step of a [`Plan`], bound to one MCP server and zero-or-more skills.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Task {
    id: Uuid,
    plan_id: Uuid,
    /// 1-based, unique per plan.
    step_number: u32,
    task_name: String,
    task_explanation: String,
    expected_result: String,
    mcp_server: String,
    skills: Vec<Uuid>,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Construct a new task in `not_started` with no skills assigned yet.
    pub fn new(
        plan_id: Uuid,
        step_number: u32,
        task_name: impl Into<String>,
        task_explanation: impl Into<String>,
        expected_result: impl Into<String>,
        mcp_server: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plan_id,
            step_number,
            task_name: task_name.into(),
            task_explanation: task_explanation.into(),
            expected_result: expected_result.into(),
            mcp_server: mcp_server.into(),
            skills: Vec::new(),
            status: TaskStatus::NotStarted,
            created_at: Utc::now(),
            start_time: None,
            completed_at: None,
        }
    }

    /// Assign skills and move to `pending`, as done when skills are created
    /// synchronously (admin path) or on step-advance (planner path).
    pub fn assign_skills(&mut self, skills: Vec<Uuid>) {
        self.skills = skills;
        self.status = TaskStatus::Pending;
    }

    /// Transition to `running` when `perform` is invoked for this task.
    pub fn start(&mut self) {
        self.status = TaskStatus::Running;
        self.start_time = Some(Utc::now());
    }

    /// Finalize the task once all its skills have been executed.
    pub fn finish(&mut self, all_succeeded: bool) {
        self.status = if all_succeeded {
            TaskStatus::Success
        } else {
            TaskStatus::Failed
        };
        self.completed_at = Some(Utc::now());
    }
}

/// An enriched skill argument: the raw value plus the schema-derived type and
/// human-facing title/description (spec.md §4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillArg {
    pub value: serde_json::Value,
    /// Schema type, or the inferred `null|array|object|<primitive>` kind,
    /// or `array[item]` for arrays, or `"unknown"` on schema mismatch.
    #[serde(rename = "type")]
    pub ty: String,
    pub title: String,
    pub description: String,
}

/// A concrete, immutable tool-invocation proposal. To re-invoke with different
/// argument values, a new Skill is created rather than mutating this one.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct Skill {
    id: Uuid,
    /// Tool name, as advertised by the MCP server.
    name: String,
    mcp_server: String,
    description: String,
    #[serde(rename = "type")]
    kind: &'static str,
    args: HashMap<String, SkillArg>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Skill {
    /// Construct a new, immutable skill proposal.
    pub fn new(
        name: impl Into<String>,
        mcp_server: impl Into<String>,
        description: impl Into<String>,
        args: HashMap<String, SkillArg>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mcp_server: mcp_server.into(),
            description: description.into(),
            kind: "function",
            args,
            created_at: now,
            updated_at: now,
        }
    }

    /// Strip the argument envelopes down to a bare `{arg: value}` map, as
    /// required before invoking the tool (spec.md §4.8 step 3).
    pub fn bare_args(&self) -> HashMap<String, serde_json::Value> {
        self.args
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }
}

/// Append-only audit/control record. The only channel by which the UI triggers
/// execution: an `approval_requested` log's id is what `perform` consumes.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct PlanLog {
    id: Uuid,
    plan_id: Uuid,
    task_id: Option<Uuid>,
    skill_id: Option<Uuid>,
    #[serde(rename = "type")]
    kind: PlanLogType,
    content: String,
    created_at: DateTime<Utc>,
}

impl PlanLog {
    /// Construct a new log entry, timestamped now.
    pub fn new(
        plan_id: Uuid,
        task_id: Option<Uuid>,
        skill_id: Option<Uuid>,
        kind: PlanLogType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plan_id,
            task_id,
            skill_id,
            kind,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// One tool advertised by an [`MCPServer`]: name, human description, and JSON
/// Schema input shape.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct MCPTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

impl MCPTool {
    /// Construct a tool descriptor as reported by `list_tools`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Runtime record of a spawned tool subprocess, cached at host startup and
/// kept alive until process shutdown. The `session` handle is opaque to
/// `conductor_core`; `conductor_mcp` owns its concrete type.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct MCPServer {
    name: String,
    description: String,
    tools: Vec<MCPTool>,
}

impl MCPServer {
    /// Construct a server record from its cached `list_tools` result.
    pub fn new(name: impl Into<String>, description: impl Into<String>, tools: Vec<MCPTool>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tools,
        }
    }

    /// Find a tool by name.
    pub fn tool(&self, name: &str) -> Option<&MCPTool> {
        self.tools.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: TaskStatus) -> Task {
        let mut t = Task::new(Uuid::new_v4(), 1, "t", "e", "r", "srv");
        t.status = status;
        t
    }

    #[test]
    fn progress_is_zero_with_no_completed_tasks() {
        let mut plan = Plan::new(
            "room",
            "plan",
            "overview",
            "assigner",
            "assignee",
            PlanContext::new(serde_json::json!({}), serde_json::json!([]), "q".into()),
        );
        let tasks = vec![task(TaskStatus::NotStarted), task(TaskStatus::Pending)];
        plan.recompute_progress(&tasks);
        assert_eq!(plan.progress, 0);
        assert_eq!(plan.status, PlanStatus::Running);
    }

    #[test]
    fn progress_100_with_no_failures_is_success() {
        let mut plan = Plan::new(
            "room",
            "plan",
            "overview",
            "assigner",
            "assignee",
            PlanContext::new(serde_json::json!({}), serde_json::json!([]), "q".into()),
        );
        let tasks = vec![task(TaskStatus::Success), task(TaskStatus::Success)];
        plan.recompute_progress(&tasks);
        assert_eq!(plan.progress, 100);
        assert_eq!(plan.status, PlanStatus::Success);
    }

    #[test]
    fn progress_100_with_any_failure_is_failed() {
        let mut plan = Plan::new(
            "room",
            "plan",
            "overview",
            "assigner",
            "assignee",
            PlanContext::new(serde_json::json!({}), serde_json::json!([]), "q".into()),
        );
        let tasks = vec![task(TaskStatus::Success), task(TaskStatus::Failed)];
        plan.recompute_progress(&tasks);
        assert_eq!(plan.progress, 100);
        assert_eq!(plan.status, PlanStatus::Failed);
    }

    #[test]
    fn no_tasks_is_immediately_complete() {
        let mut plan = Plan::new(
            "room",
            "plan",
            "overview",
            "assigner",
            "assignee",
            PlanContext::new(serde_json::json!({}), serde_json::json!([]), "q".into()),
        );
        plan.recompute_progress(&[]);
        assert_eq!(plan.progress, 100);
        assert_eq!(plan.status, PlanStatus::Success);
    }

    #[test]
    fn bare_args_strips_envelope() {
        let mut args = HashMap::new();
        args.insert(
            "path".to_string(),
            SkillArg {
                value: serde_json::json!("/tmp/a"),
                ty: "string".into(),
                title: "path".into(),
                description: "target path".into(),
            },
        );
        let skill = Skill::new("write_file", "fs", "writes a file", args);
        let bare = skill.bare_args();
        assert_eq!(bare.get("path"), Some(&serde_json::json!("/tmp/a")));
    }
}
