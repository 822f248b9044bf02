//! Ollama embeddings backend for the legacy semantic server-selection path
//! (spec.md §9: "bypasser" — an alternate, non-LLM-planned server-selection
//! strategy that implementations may optionally support).

use crate::dto::{EmbedRequest, EmbedResponse};
use async_trait::async_trait;
use conductor_error::{LlmError, LlmErrorKind, LlmResult};
use conductor_interface::LlmEmbeddingBackend;
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Embeddings client for a local Ollama instance's `/api/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingBackend {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaEmbeddingBackend {
    /// Construct a backend pointed at `base_url` (e.g. `http://localhost:11434`).
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl LlmEmbeddingBackend for OllamaEmbeddingBackend {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let body = EmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "embed request failed");
                LlmError::new(LlmErrorKind::Request(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "embed backend returned an error");
            return Err(LlmError::new(LlmErrorKind::Api {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "failed to parse embed response");
            LlmError::new(LlmErrorKind::ResponseParsing(e.to_string()))
        })?;

        debug!(dims = parsed.embedding.len(), "received embedding");
        Ok(parsed.embedding)
    }
}
