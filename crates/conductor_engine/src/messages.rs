//! Markdown chat message bodies the engine posts to the realtime bus
//! (spec.md §4.6 step 5, §4.7 step 4, §4.8 steps 7-8).

use conductor_interface::{ChatMessage, User};
use uuid::Uuid;

pub fn plan_created(plan_name: &str, plan_id: Uuid, plan_overview: &str) -> String {
    format!("**Plan created: {plan_name}** (`{plan_id}`)\n\n{plan_overview}")
}

pub fn approval_requested(summary: &str, log_id: Uuid) -> String {
    format!("Approval needed: {summary}\n\nApprove with log id `{log_id}`.")
}

pub fn plan_completed(plan_name: &str, summary: &str) -> String {
    format!("**Plan complete: {plan_name}**\n\n{summary}")
}

/// Build a chat bus message from the assignee/sender [`User`] record, as
/// required by spec.md's message payload shape (§6).
pub fn to_chat_message(room_id: &str, sender: &User, content: String) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4(),
        created_at: chrono::Utc::now(),
        sender: sender.username.clone(),
        content,
        avatar: sender.avatar.clone(),
        room_id: room_id.to_string(),
        mentions: Vec::new(),
    }
}
