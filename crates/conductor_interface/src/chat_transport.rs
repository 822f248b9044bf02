//! Trait seam for the realtime chat bus transport.

use crate::persistence::ChatMessage;
use async_trait::async_trait;
use conductor_error::SocketResult;

/// Sends agent-produced messages into the chat bus. Implemented by
/// `conductor_socket::SocketClient`; faked in `conductor_engine` tests.
///
/// `send_message` must be idempotent by `msg.id` (Testable Property 4):
/// repeat calls with an id already successfully emitted are no-ops.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, msg: ChatMessage) -> SocketResult<()>;
    async fn join_room(&self, room_id: &str) -> SocketResult<()>;
    async fn quit_room(&self, room_id: &str) -> SocketResult<()>;
}
