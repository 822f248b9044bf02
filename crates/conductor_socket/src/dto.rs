//! Wire frames for the realtime chat bus (spec.md §6).
//!
//! The original transport is socket.io; this client speaks plain JSON text
//! frames over a `tokio-tungstenite` WebSocket, with an `{event, data}`
//! envelope standing in for socket.io's named emits/listeners.

use conductor_interface::ChatMessage;
use serde::{Deserialize, Serialize};

/// Initial auth handshake frame, sent immediately after the WS upgrade.
#[derive(Debug, Clone, Serialize)]
pub struct AuthFrame<'a> {
    pub user: AuthUser<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthUser<'a> {
    pub id: &'a str,
}

/// Outbound emits (spec.md §6: `join_room`, `quit_room`, `message`, `ping`).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Emit {
    JoinRoom { room_id: String },
    QuitRoom { room_id: String },
    Message(ChatMessage),
    Ping { timestamp: i64 },
}

/// Inbound events (spec.md §6: `message`, `notification`, `pong`).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Received {
    Message(ChatMessage),
    Notification(serde_json::Value),
    Pong { timestamp: i64 },
}
