//! OpenAI-compatible chat backend with function-calling support (spec.md §4.3,
//! §4.6, §4.8).

use crate::dto::{ChatMessage, ChatRequest, ChatResponse};
use crate::retry::{RetryConfig, retry_with_backoff};
use async_trait::async_trait;
use conductor_core::{GenerateRequest, GenerateResponse, Input, Output, Role, ToolCall};
use conductor_error::{LlmError, LlmErrorKind, LlmResult};
use conductor_interface::LlmChatBackend;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, instrument};

/// Chat/completion client talking to any OpenAI-compatible `/chat/completions`
/// endpoint (DeepSeek, OpenAI, etc.), retried through [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct OpenAiChatBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryConfig,
}

impl OpenAiChatBackend {
    /// Construct a backend pointed at `base_url` (the full
    /// `/chat/completions` URL) using `model` as the default.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            retry: RetryConfig::default(),
        }
    }

    /// Override the retry/backoff policy (default: 3 attempts, 100ms initial backoff).
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[instrument(skip(self, request, tools), fields(model = %self.model))]
    async fn send_once(
        &self,
        request: &GenerateRequest,
        tools: &[Value],
        tool_choice: &str,
    ) -> LlmResult<GenerateResponse> {
        let chat_request = to_chat_request(request, tools, tool_choice, &self.model)?;

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "chat request failed");
                LlmError::new(LlmErrorKind::Request(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "chat backend returned an error");
            return Err(LlmError::new(LlmErrorKind::Api {
                status: status.as_u16(),
                body,
            }));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "failed to parse chat response");
            LlmError::new(LlmErrorKind::ResponseParsing(e.to_string()))
        })?;

        debug!(choices = chat_response.choices.len(), "received chat response");
        from_chat_response(&chat_response, tool_choice)
    }
}

#[async_trait]
impl LlmChatBackend for OpenAiChatBackend {
    async fn chat(
        &self,
        request: &GenerateRequest,
        tools: &[Value],
        tool_choice: &str,
    ) -> LlmResult<GenerateResponse> {
        retry_with_backoff(&self.retry, || self.send_once(request, tools, tool_choice)).await
    }
}

fn to_chat_request(
    req: &GenerateRequest,
    tools: &[Value],
    tool_choice: &str,
    default_model: &str,
) -> LlmResult<ChatRequest> {
    let messages = req
        .messages
        .iter()
        .map(|msg| ChatMessage {
            role: match msg.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            }
            .to_string(),
            content: msg
                .content
                .iter()
                .map(Input::as_text)
                .collect::<Vec<_>>()
                .join("\n"),
        })
        .collect();

    let mut builder = ChatRequest::builder();
    builder
        .model(req.model.clone().unwrap_or_else(|| default_model.to_string()))
        .messages(messages);

    if let Some(max_tokens) = req.max_tokens {
        builder.max_tokens(Some(max_tokens));
    }
    if let Some(temperature) = req.temperature {
        builder.temperature(Some(temperature));
    }
    if !tools.is_empty() {
        builder.tools(Some(tools.to_vec()));
        builder.tool_choice(Some(tool_choice.to_string()));
    }

    builder
        .build()
        .map_err(|e| LlmError::new(LlmErrorKind::Request(format!("failed to build chat request: {e}"))))
}

fn from_chat_response(response: &ChatResponse, tool_choice: &str) -> LlmResult<GenerateResponse> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| LlmError::new(LlmErrorKind::ResponseParsing("no choices in response".into())))?;

    if let Some(tool_calls) = &choice.message.tool_calls {
        if !tool_calls.is_empty() {
            let calls = tool_calls
                .iter()
                .map(|tc| {
                    let arguments: Value = serde_json::from_str(&tc.function.arguments)
                        .unwrap_or(Value::Object(Default::default()));
                    ToolCall {
                        id: tc.id.clone(),
                        name: tc.function.name.clone(),
                        arguments,
                    }
                })
                .collect();
            return Ok(GenerateResponse {
                outputs: vec![Output::ToolCalls(calls)],
            });
        }
    }

    if tool_choice == "required" {
        return Err(LlmError::new(LlmErrorKind::NoToolCall));
    }

    let text = choice.message.content.clone().unwrap_or_default();
    Ok(GenerateResponse {
        outputs: vec![Output::Text(text)],
    })
}
