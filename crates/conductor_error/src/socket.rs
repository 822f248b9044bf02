//! Realtime socket client error types.

use derive_more::{Display, Error};

/// Specific error conditions for the realtime socket client.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SocketErrorKind {
    /// The client is not currently connected.
    #[display("not connected")]
    Disconnected,

    /// The pre-send health-check ping failed.
    #[display("health check failed: {}", _0)]
    HealthCheckFailed(String),

    /// The underlying transport returned an error.
    #[display("transport error: {}", _0)]
    Transport(String),

    /// Reconnect attempts were exhausted.
    #[display("reconnect exhausted after {} attempts", _0)]
    ReconnectExhausted(usize),

    /// The send retry policy was exhausted.
    #[display("send retry exhausted for message {}", _0)]
    SendExhausted(String),
}

impl SocketErrorKind {
    /// Whether this failure should trigger the caller's retry/reconnect wrapper.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Disconnected | Self::HealthCheckFailed(_) | Self::Transport(_)
        )
    }
}

/// Socket client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Socket Error: {} at {}:{}", kind, file, line)]
pub struct SocketError {
    /// The specific error kind.
    pub kind: SocketErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl SocketError {
    /// Creates a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SocketErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for socket client operations.
pub type SocketResult<T> = Result<T, SocketError>;
