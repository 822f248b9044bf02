//! Wire types for the OpenAI-compatible chat completions API, extended with
//! the `tools`/`tool_choice` fields function calling needs.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    /// Message content.
    pub content: String,
}

/// OpenAI chat completion request, with function-calling fields.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Function-calling catalog, as built by `conductor_mcp::catalog`.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    /// `"auto"` or `"required"`; omitted when no tools are offered.
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

impl ChatRequest {
    /// Creates a new builder for `ChatRequest`.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// One function call requested by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallDto {
    pub id: String,
    pub function: ToolCallFunctionDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallFunctionDto {
    pub name: String,
    /// JSON-encoded argument object, per the OpenAI wire format.
    pub arguments: String,
}

/// A choice in the OpenAI response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallDto>>,
}

/// Token usage statistics (unused beyond logging; the orchestrator's cost
/// accounting lives outside this crate).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<usize>,
    #[serde(default)]
    pub completion_tokens: Option<usize>,
    #[serde(default)]
    pub total_tokens: Option<usize>,
}

/// OpenAI chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// Request body for the Ollama `/api/embeddings` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedRequest {
    pub model: String,
    pub prompt: String,
}

/// Response body from the Ollama `/api/embeddings` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
}
