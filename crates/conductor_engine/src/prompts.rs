//! System and user prompt bodies for the three LLM calls the engine makes:
//! plan synthesis, admin tool-choice, and skill synthesis (spec.md §4.3).

use conductor_core::MCPServer;
use std::collections::HashMap;

pub const PLAN_SYSTEM_PROMPT: &str = r#"You read a conversation and decide whether it calls for a multi-step plan, then assign each step to the assistant best suited to carry it out.

Produce strictly JSON matching this shape:
{
  "plan_name": <short plan name, or "null_plan" if no plan is warranted>,
  "plan_overview": <one paragraph>,
  "plan": {
    "step_1": {"name": <task name>, "assignee": <assistant name>, "explanation": <why>, "expected_result": <what success looks like>},
    "step_2": {...}
  }
}

If nothing in the conversation requires a tool, return "plan_name": "null_plan" and an empty "plan"."#;

pub fn plan_user_prompt(conversation: &str, now: &str, servers: &HashMap<String, MCPServer>) -> String {
    let assistants = servers.keys().cloned().collect::<Vec<_>>().join(", ");
    let descriptions = servers
        .values()
        .map(|s| conductor_mcp::describe_server(s))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Conversation\n{conversation}\n\nCurrent datetime\n{now}\n\nAssistants\n{assistants}\n\nAssistant capabilities\n{descriptions}"
    )
}

pub const ADMIN_SYSTEM_PROMPT: &str = r#"You act for a chatroom's owner, carrying out administrative actions on their behalf.

You are given a conversation history, the room's id and participants, and the owner's latest instruction. Choose whichever administrative tool fits; if nothing needs doing, call `idle`."#;

pub fn admin_user_prompt(conversation: &str, room_id: &str, participants: &str, owner_message: &str) -> String {
    format!(
        "Conversation history\n{conversation}\n\nRoom id\n{room_id}\n\nParticipants\n{participants}\n\nOwner's message\n{owner_message}"
    )
}

pub const SKILL_SYSTEM_PROMPT: &str = r#"You choose the concrete tool calls needed to carry out one step of a plan, using only the tools offered to you."#;

pub fn skill_user_prompt(task_name: &str, task_explanation: &str, expected_result: &str, background: &str) -> String {
    format!(
        "Task\n{task_name}\n\nExplanation\n{task_explanation}\n\nExpected result\n{expected_result}\n\nBackground\n{background}"
    )
}

pub const SUMMARY_SYSTEM_PROMPT: &str = r#"You summarize a completed plan's execution log for the room, in a friendly, concise paragraph suitable for a chat message."#;

pub fn summary_user_prompt(plan_name: &str, plan_overview: &str, logs: &str) -> String {
    format!("Plan\n{plan_name}\n\nOverview\n{plan_overview}\n\nLog\n{logs}")
}
