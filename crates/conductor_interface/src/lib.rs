//! Trait seams between the orchestration engine and its external collaborators.
//!
//! Each trait here has exactly one production implementation elsewhere in the
//! workspace (`conductor_persistence`, `conductor_socket`, `conductor_llm`) and is
//! faked with an in-memory stand-in in `conductor_engine`'s tests.

mod chat_transport;
mod llm;
mod mcp;
mod persistence;

pub use chat_transport::ChatTransport;
pub use llm::{LlmChatBackend, LlmEmbeddingBackend};
pub use mcp::{ToolCallOutcome, ToolInvoker};
pub use persistence::{ChatMessage, PersistenceBackend, User};
