//! Planner / Admin Handler / Execution Engine error types.

use derive_more::{Display, Error};

/// Specific error conditions for the orchestration engine.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum EngineErrorKind {
    /// A referenced plan, task, or skill id does not exist.
    #[display("unknown {}: {}", kind, id)]
    Reference {
        /// Entity kind, e.g. "task" or "skill".
        kind: &'static str,
        /// The id that was not found.
        id: String,
    },

    /// A skill's declared MCP server is not in the catalog.
    #[display("unknown server: {}", _0)]
    UnknownServer(String),

    /// Downstream MCP, LLM, persistence, socket, or security error.
    #[display("{}", _0)]
    Upstream(String),
}

/// Engine error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Engine Error: {} at {}:{}", kind, file, line)]
pub struct EngineError {
    /// The specific error kind.
    pub kind: EngineErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl EngineError {
    /// Creates a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: EngineErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<crate::McpError> for EngineError {
    #[track_caller]
    fn from(e: crate::McpError) -> Self {
        EngineError::new(EngineErrorKind::Upstream(e.to_string()))
    }
}

impl From<crate::LlmError> for EngineError {
    #[track_caller]
    fn from(e: crate::LlmError) -> Self {
        EngineError::new(EngineErrorKind::Upstream(e.to_string()))
    }
}

impl From<crate::PersistenceError> for EngineError {
    #[track_caller]
    fn from(e: crate::PersistenceError) -> Self {
        EngineError::new(EngineErrorKind::Upstream(e.to_string()))
    }
}

impl From<crate::SocketError> for EngineError {
    #[track_caller]
    fn from(e: crate::SocketError) -> Self {
        EngineError::new(EngineErrorKind::Upstream(e.to_string()))
    }
}

impl From<crate::SecurityError> for EngineError {
    #[track_caller]
    fn from(e: crate::SecurityError) -> Self {
        EngineError::new(EngineErrorKind::Upstream(e.to_string()))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
