//! Public [`ChatTransport`] implementation over the background connection actor.

use crate::connection::{self, Command};
use async_trait::async_trait;
use conductor_error::{SocketError, SocketErrorKind, SocketResult};
use conductor_interface::{ChatMessage, ChatTransport};
use tokio::sync::{mpsc, oneshot};

/// Resilient realtime client: reconnect/backoff, heartbeat, room rejoin, and
/// idempotent send are all owned by a single background task
/// (`conductor_socket::connection::run`), matching the teacher's pattern of a
/// long-lived `JoinHandle`-backed worker per connection.
#[derive(Debug, Clone)]
pub struct SocketClient {
    commands: mpsc::UnboundedSender<Command>,
}

impl SocketClient {
    /// Spawn the background connection actor and return a handle to it.
    ///
    /// Connection itself happens inside the actor loop and is retried forever
    /// with backoff; this call returns as soon as the actor task is spawned.
    pub fn connect(url: impl Into<String>, user_id: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(connection::run(url.into(), user_id.into(), rx));
        Self { commands: tx }
    }
}

#[async_trait]
impl ChatTransport for SocketClient {
    async fn send_message(&self, msg: ChatMessage) -> SocketResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(Command::SendMessage(msg, ack_tx))
            .map_err(|_| SocketError::new(SocketErrorKind::Disconnected))?;
        ack_rx
            .await
            .map_err(|_| SocketError::new(SocketErrorKind::Disconnected))
    }

    async fn join_room(&self, room_id: &str) -> SocketResult<()> {
        self.commands
            .send(Command::JoinRoom(room_id.to_string()))
            .map_err(|_| SocketError::new(SocketErrorKind::Disconnected))
    }

    async fn quit_room(&self, room_id: &str) -> SocketResult<()> {
        self.commands
            .send(Command::QuitRoom(room_id.to_string()))
            .map_err(|_| SocketError::new(SocketErrorKind::Disconnected))
    }
}
