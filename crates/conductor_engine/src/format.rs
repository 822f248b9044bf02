//! Conversation and log formatting shared by the planner, admin handler, and
//! execution engine (spec.md §4.6, §4.8).

use conductor_core::{Input, Message, PlanLog, Role};
use conductor_interface::ChatMessage;

/// Strip the `@agent` mention from a summoning query, exactly as the
/// original's `query.replace("@agent", "")`.
pub fn strip_agent_mention(query: &str) -> String {
    query.replace("@agent", "")
}

/// Map stored chat history into LLM conversation turns, normalizing
/// `sender == "agent"` to `Role::Assistant` and everything else to
/// `Role::User`, then append `trailing_query` as the final user turn.
pub fn to_conversation(history: &[ChatMessage], trailing_query: Option<&str>) -> Vec<Message> {
    let mut turns: Vec<Message> = history
        .iter()
        .map(|msg| Message {
            role: if msg.sender == "agent" { Role::Assistant } else { Role::User },
            content: vec![Input::Text(msg.content.clone())],
        })
        .collect();

    if let Some(query) = trailing_query {
        turns.push(Message {
            role: Role::User,
            content: vec![Input::Text(query.to_string())],
        });
    }
    turns
}

/// Render a conversation as `sender: content` lines, oldest first, for
/// embedding into a prompt body.
pub fn format_conversation(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| format!("{}: {}", msg.sender, msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the same conversation newest-first, as used for the background
/// context handed to skill synthesis on step-advance (spec.md §4.8 step 8).
pub fn format_conversation_reverse(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .rev()
        .map(|msg| format!("{}: {}", msg.sender, msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an in-memory conversation (LLM-shaped turns) as `role: content`
/// lines, for embedding directly into a prompt body.
pub fn render_messages(turns: &[Message]) -> String {
    turns
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            let content = m.content.iter().map(Input::as_text).collect::<Vec<_>>().join("\n");
            format!("{role}: {content}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render prior steps' logs as `Step k: content`, in the order given.
pub fn format_step_logs(logs: &[PlanLog]) -> String {
    logs.iter()
        .enumerate()
        .map(|(i, log)| format!("Step {}: {}", i + 1, log.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the room roster as `username (id)` lines, used by the admin prompt.
pub fn format_users(users: &[conductor_interface::User]) -> String {
    users
        .iter()
        .map(|u| format!("{} ({})", u.username, u.id))
        .collect::<Vec<_>>()
        .join("\n")
}
