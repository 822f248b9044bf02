//! MCP Host and Tool Catalog (spec.md §4.1, §4.2).
//!
//! Spawns each configured tool server as a child process over the `rmcp` client
//! SDK's stdio transport, caches its tool list, and projects that list into the
//! LLM-facing "function" descriptors the Planner and Admin Handler consume.

#![forbid(unsafe_code)]

mod catalog;
mod host;
mod manifest;

pub use catalog::{all_function_descriptors, describe_server, function_descriptors};
pub use host::{DEFAULT_CALL_TOOL_TIMEOUT, McpHost, ToolCallResult};
pub use manifest::{Manifest, ServerManifestEntry};
