//! Input types for LLM requests.

use serde::{Deserialize, Serialize};

/// Supported input types to LLMs.
///
/// The orchestrator's conversation history is text-only: chat messages and
/// tool results are both carried as plain text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),
}

impl Input {
    /// Borrow the text content, if this is a text input.
    pub fn as_text(&self) -> &str {
        match self {
            Input::Text(s) => s,
        }
    }
}
