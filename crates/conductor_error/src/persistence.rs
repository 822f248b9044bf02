//! Persistence client error types.

use derive_more::{Display, Error};

/// Specific error conditions for the persistence REST client.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PersistenceErrorKind {
    /// The HTTP request failed before a response was received.
    #[display("request failed: {}", _0)]
    Request(String),

    /// The service responded with a non-2xx status.
    #[display("persistence service returned {}: {}", status, body)]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[display("response decoding failed: {}", _0)]
    Decode(String),

    /// A referenced entity (plan, task, skill, log, user) does not exist.
    #[display("unknown {}: {}", kind, id)]
    NotFound {
        /// Entity kind, e.g. "plan" or "skill".
        kind: &'static str,
        /// The id that was not found.
        id: String,
    },
}

/// Persistence client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Persistence Error: {} at {}:{}", kind, file, line)]
pub struct PersistenceError {
    /// The specific error kind.
    pub kind: PersistenceErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl PersistenceError {
    /// Creates a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PersistenceErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for persistence client operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
