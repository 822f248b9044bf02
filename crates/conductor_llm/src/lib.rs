//! LLM Gateway: chat/completion and embedding back-ends, plan extraction, and
//! skill argument enrichment (spec.md §4.3).

mod chat;
mod dto;
#[cfg(feature = "bypasser")]
mod embed;
mod enrich;
mod plan_extract;
mod retry;

pub use chat::OpenAiChatBackend;
#[cfg(feature = "bypasser")]
pub use embed::OllamaEmbeddingBackend;
pub use enrich::enrich_args;
pub use plan_extract::{ExtractedPlan, classify_plan, extract_plan, extract_plan_json};
pub use retry::{CircuitBreaker, CircuitState, RetryConfig, retry_with_backoff};
