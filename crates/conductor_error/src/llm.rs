//! LLM Gateway error types.

use derive_more::{Display, Error};

/// Specific error conditions for LLM gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LlmErrorKind {
    /// The HTTP request to the model backend failed.
    #[display("request failed: {}", _0)]
    Request(String),

    /// The backend responded with a non-2xx status.
    #[display("backend returned {}: {}", status, body)]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// The response body could not be parsed as JSON.
    #[display("response parsing failed: {}", _0)]
    ResponseParsing(String),

    /// Tool choice was forced but the model returned no tool call.
    #[display("tool choice was required but no tool call was returned")]
    NoToolCall,

    /// The plan JSON could not be extracted from the response text.
    #[display("no parseable plan in response")]
    NoPlan,
}

impl LlmErrorKind {
    /// Whether an operation that failed with this kind is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Api { .. })
    }

    /// Whether this kind indicates the backend asked us to slow down.
    pub fn should_backoff(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == 429 || *status >= 500)
    }
}

/// LLM gateway error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM Error: {} at {}:{}", kind, file, line)]
pub struct LlmError {
    /// The specific error kind.
    pub kind: LlmErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LlmErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for LLM gateway operations.
pub type LlmResult<T> = Result<T, LlmError>;
