//! Background connection actor: owns the WebSocket, reconnects with backoff,
//! re-joins tracked rooms, and drains the pending-send queue (spec.md §8
//! Testable Properties 4 and 5, Scenario S5).

use crate::backoff::{Backoff, BackoffConfig};
use crate::dto::{AuthFrame, AuthUser, Emit, Received};
use conductor_interface::ChatMessage;
use futures_util::{SinkExt, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

pub enum Command {
    JoinRoom(String),
    QuitRoom(String),
    SendMessage(ChatMessage, oneshot::Sender<()>),
}

/// Runs forever, reconnecting on any transport failure. Never returns except
/// when the command channel is dropped (client shut down).
pub async fn run(url: String, user_id: String, mut commands: mpsc::UnboundedReceiver<Command>) {
    let mut joined_rooms: Vec<String> = Vec::new();
    let mut sent_ids: HashSet<Uuid> = HashSet::new();
    let mut pending: VecDeque<ChatMessage> = VecDeque::new();
    let mut backoff = Backoff::new(BackoffConfig::default());

    loop {
        let socket = match tokio_tungstenite::connect_async(&url).await {
            Ok((socket, _response)) => {
                info!(%url, "socket connected");
                backoff.reset();
                socket
            }
            Err(e) => {
                let delay = backoff.next();
                warn!(%url, error = ?e, delay_ms = delay.as_millis(), "socket connect failed, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        let (mut write, mut read) = socket.split();

        let auth = AuthFrame {
            user: AuthUser { id: &user_id },
        };
        if let Ok(text) = serde_json::to_string(&auth) {
            let _ = write.send(WsMessage::Text(text.into())).await;
        }

        for room in &joined_rooms {
            if let Err(e) = emit(&mut write, &Emit::JoinRoom { room_id: room.clone() }).await {
                warn!(room, error = ?e, "failed to re-join room after reconnect");
                break;
            }
            debug!(room, "re-joined room after reconnect");
        }

        while let Some(msg) = pending.front().cloned() {
            if sent_ids.contains(&msg.id) {
                pending.pop_front();
                continue;
            }
            match emit(&mut write, &Emit::Message(msg.clone())).await {
                Ok(()) => {
                    sent_ids.insert(msg.id);
                    pending.pop_front();
                    debug!(message_id = %msg.id, "flushed pending message");
                }
                Err(e) => {
                    warn!(error = ?e, "failed to flush pending message, will retry after reconnect");
                    break;
                }
            }
        }

        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;

        let disconnect_reason = 'session: loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    let timestamp = SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .map(|d| d.as_secs() as i64)
                        .unwrap_or(0);
                    if let Err(e) = emit(&mut write, &Emit::Ping { timestamp }).await {
                        break 'session e.to_string();
                    }
                }
                incoming = read.next() => {
                    match incoming {
                        Some(Ok(WsMessage::Text(text))) => {
                            match serde_json::from_str::<Received>(&text) {
                                Ok(Received::Pong { .. }) => debug!("heartbeat pong received"),
                                Ok(Received::Message(msg)) => debug!(message_id = %msg.id, "inbound chat message"),
                                Ok(Received::Notification(n)) => debug!(?n, "inbound notification"),
                                Err(e) => warn!(error = ?e, "unrecognized inbound frame"),
                            }
                        }
                        Some(Ok(WsMessage::Close(frame))) => {
                            break 'session format!("server closed connection: {frame:?}");
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => break 'session e.to_string(),
                        None => break 'session "connection stream ended".to_string(),
                    }
                }
                command = commands.recv() => {
                    match command {
                        Some(Command::JoinRoom(room)) => {
                            if !joined_rooms.contains(&room) {
                                joined_rooms.push(room.clone());
                            }
                            if let Err(e) = emit(&mut write, &Emit::JoinRoom { room_id: room }).await {
                                break 'session e.to_string();
                            }
                        }
                        Some(Command::QuitRoom(room)) => {
                            joined_rooms.retain(|r| r != &room);
                            if let Err(e) = emit(&mut write, &Emit::QuitRoom { room_id: room }).await {
                                break 'session e.to_string();
                            }
                        }
                        Some(Command::SendMessage(msg, ack)) => {
                            if sent_ids.contains(&msg.id) {
                                let _ = ack.send(());
                                continue;
                            }
                            pending.push_back(msg.clone());
                            let _ = ack.send(());
                            match emit(&mut write, &Emit::Message(msg.clone())).await {
                                Ok(()) => {
                                    sent_ids.insert(msg.id);
                                    pending.retain(|m| m.id != msg.id);
                                }
                                Err(e) => {
                                    warn!(error = ?e, "send failed, message remains pending until reconnect");
                                }
                            }
                        }
                        None => {
                            info!("command channel closed, shutting down socket connection");
                            return;
                        }
                    }
                }
            }
        };

        error!(reason = %disconnect_reason, "socket connection lost, reconnecting");
    }
}

type WsWrite = futures_util::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    WsMessage,
>;

async fn emit(write: &mut WsWrite, frame: &Emit) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let text = serde_json::to_string(frame).expect("Emit always serializes");
    write.send(WsMessage::Text(text.into())).await
}
