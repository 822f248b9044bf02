//! Trait seam for the MCP subprocess tool fabric.

use async_trait::async_trait;
use conductor_error::McpResult;
use serde_json::Value;
use std::collections::HashMap;

/// Result of one `call_tool` invocation, per the MCP wire contract (spec.md §4.1).
#[derive(Debug, Clone)]
pub struct ToolCallOutcome {
    /// Concatenated text content blocks returned by the tool.
    pub content: Vec<String>,
    pub is_error: bool,
}

/// Invokes a named tool on a named MCP server. Implemented by
/// `conductor_mcp::McpHost`; faked in `conductor_engine` tests so the
/// execution engine's state machine can be exercised without spawning
/// subprocesses.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn call_tool(
        &self,
        server: &str,
        tool: &str,
        args: HashMap<String, Value>,
    ) -> McpResult<ToolCallOutcome>;
}
