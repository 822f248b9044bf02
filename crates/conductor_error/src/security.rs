//! Approval workflow error types.

use derive_more::{Display, Error};

/// Specific error conditions for the approval workflow.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SecurityErrorKind {
    /// The referenced log-id has no pending approval.
    #[display("unknown approval log: {}", _0)]
    UnknownLog(String),

    /// The approval was denied.
    #[display("approval denied for log {}: {}", log_id, reason)]
    Denied {
        /// The log id that was denied.
        log_id: String,
        /// Denial reason.
        reason: String,
    },

    /// `perform` was called twice for the same log.
    #[display("log {} already processed", _0)]
    AlreadyProcessed(String),
}

/// Approval workflow error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Security Error: {} at {}:{}", kind, file, line)]
pub struct SecurityError {
    /// The specific error kind.
    pub kind: SecurityErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl SecurityError {
    /// Creates a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SecurityErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for approval workflow operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
