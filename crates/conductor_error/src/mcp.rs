//! MCP Host / subprocess transport error types.

use derive_more::{Display, Error};

/// Specific error conditions for MCP host operations.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum McpErrorKind {
    /// The named server is not in the manifest.
    #[display("unknown server: {}", _0)]
    UnknownServer(String),

    /// Subprocess failed to spawn.
    #[display("failed to spawn server {}: {}", server, reason)]
    SpawnFailed {
        /// Server name.
        server: String,
        /// Spawn failure reason.
        reason: String,
    },

    /// The server's subprocess session is no longer alive.
    #[display("session closed for server: {}", _0)]
    SessionClosed(String),

    /// `call_tool` exceeded its configured deadline.
    #[display("call to {} on {} timed out", tool, server)]
    Timeout {
        /// Server name.
        server: String,
        /// Tool name.
        tool: String,
    },

    /// The named tool is not advertised by the server.
    #[display("tool {} not found on server {}", tool, server)]
    ToolNotFound {
        /// Server name.
        server: String,
        /// Tool name.
        tool: String,
    },

    /// The underlying JSON-RPC transport returned a protocol error.
    #[display("transport error: {}", _0)]
    Transport(String),
}

/// MCP error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("MCP Error: {} at {}:{}", kind, file, line)]
pub struct McpError {
    /// The specific error kind.
    pub kind: McpErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl McpError {
    /// Creates a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: McpErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for MCP host operations.
pub type McpResult<T> = Result<T, McpError>;
