//! Configuration error types.

use derive_more::{Display, Error};

/// Specific error conditions for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ConfigErrorKind {
    /// A recognized environment variable was missing.
    #[display("missing environment variable: {}", _0)]
    MissingVar(String),

    /// An environment variable was present but failed to parse.
    #[display("invalid value for {}: {}", var, reason)]
    InvalidVar {
        /// Variable name.
        var: String,
        /// Why it failed to parse.
        reason: String,
    },

    /// The MCP server manifest could not be read or parsed.
    #[display("manifest unreadable: {}", _0)]
    ManifestUnreadable(String),
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config Error: {} at {}:{}", kind, file, line)]
pub struct ConfigError {
    /// The specific error kind.
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
