//! Trait seams for the LLM Gateway's two back-ends.

use async_trait::async_trait;
use conductor_core::{GenerateRequest, GenerateResponse};
use conductor_error::LlmResult;
use serde_json::Value;

/// Chat/completion back-end with function-calling support (spec.md §4.3).
///
/// `tool_choice` mirrors the OpenAI-compatible wire values: `"auto"` for plan
/// synthesis, `"required"` to force a tool call for skill/admin synthesis.
#[async_trait]
pub trait LlmChatBackend: Send + Sync {
    async fn chat(
        &self,
        request: &GenerateRequest,
        tools: &[Value],
        tool_choice: &str,
    ) -> LlmResult<GenerateResponse>;
}

/// Embeddings back-end used by the legacy "bypasser" semantic server-selection
/// path (spec.md §9, `bypasser` feature in `conductor_llm`).
#[async_trait]
pub trait LlmEmbeddingBackend: Send + Sync {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>>;
}
