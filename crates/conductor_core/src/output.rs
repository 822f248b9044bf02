//! Output types from LLM responses.

use serde::{Deserialize, Serialize};

/// Supported output types from LLMs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),

    /// Vector embedding output (bypasser semantic server selection).
    Embedding(Vec<f32>),

    /// Structured JSON output.
    Json(serde_json::Value),

    /// Tool/function calls requested by the model.
    ///
    /// Returned when the model was given a catalog and (for skill synthesis)
    /// forced tool choice; one entry per chosen tool invocation.
    ToolCalls(Vec<ToolCall>),
}

/// A tool/function call made by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call.
    pub id: String,
    /// Name of the tool/function to call.
    pub name: String,
    /// Arguments to pass to the tool (as JSON).
    pub arguments: serde_json::Value,
}
