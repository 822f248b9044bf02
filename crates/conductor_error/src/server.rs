//! HTTP front-end error types.

use derive_more::{Display, Error};

/// Specific error conditions for the HTTP front-end.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ServerErrorKind {
    /// The request body failed to deserialize or validate.
    #[display("bad request: {}", _0)]
    BadRequest(String),

    /// A downstream engine call failed.
    #[display("internal error: {}", _0)]
    Internal(String),
}

/// HTTP front-end error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Server Error: {} at {}:{}", kind, file, line)]
pub struct ServerError {
    /// The specific error kind.
    pub kind: ServerErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl ServerError {
    /// Creates a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServerErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<crate::EngineError> for ServerError {
    #[track_caller]
    fn from(e: crate::EngineError) -> Self {
        ServerError::new(ServerErrorKind::Internal(e.to_string()))
    }
}

/// Result type for HTTP front-end operations.
pub type ServerResult<T> = Result<T, ServerError>;
