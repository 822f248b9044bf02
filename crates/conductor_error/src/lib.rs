//! Error types for the agent orchestration engine.
//!
//! Each domain (MCP, LLM, socket, persistence, security, engine, server, config) gets
//! its own `XxxError`/`XxxErrorKind` pair. Errors carry the source location via
//! `#[track_caller]` rather than a backtrace, matching the rest of the workspace.

mod config;
mod engine;
mod llm;
mod mcp;
mod persistence;
mod security;
mod server;
mod socket;

pub use config::{ConfigError, ConfigErrorKind, ConfigResult};
pub use engine::{EngineError, EngineErrorKind, EngineResult};
pub use llm::{LlmError, LlmErrorKind, LlmResult};
pub use mcp::{McpError, McpErrorKind, McpResult};
pub use persistence::{PersistenceError, PersistenceErrorKind, PersistenceResult};
pub use security::{SecurityError, SecurityErrorKind, SecurityResult};
pub use server::{ServerError, ServerErrorKind, ServerResult};
pub use socket::{SocketError, SocketErrorKind, SocketResult};
