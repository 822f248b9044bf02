//! MCP Host: spawns each tool server as a child process and exposes
//! `list_tools`/`call_tool` over the official `rmcp` client SDK (spec.md §4.1).

use crate::manifest::Manifest;
use async_trait::async_trait;
use conductor_core::{MCPServer, MCPTool};
use conductor_error::{McpError, McpErrorKind, McpResult};
use conductor_interface::{ToolCallOutcome, ToolInvoker};
use rmcp::model::CallToolRequestParam;
use rmcp::service::{RoleClient, RunningService, ServiceExt};
use rmcp::transport::TokioChildProcess;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Default deadline for a single `call_tool` (spec.md §5: "implementations should
/// impose one, e.g. 120s per call").
pub const DEFAULT_CALL_TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Result of a `call_tool` invocation, per the MCP wire contract.
#[derive(Debug, Clone)]
pub struct ToolCallResult {
    /// Concatenated text content blocks returned by the tool.
    pub content: Vec<String>,
    pub is_error: bool,
}

/// A live subprocess session. The transport is request-reply over a single pipe,
/// so concurrent `call_tool`s for the same server are serialized through `lock`.
struct Session {
    service: RunningService<RoleClient, ()>,
    lock: Mutex<()>,
}

/// Owns every spawned MCP subprocess and the cached tool catalog from their
/// `list_tools` responses. On subprocess exit the host does not restart it.
pub struct McpHost {
    sessions: HashMap<String, Arc<Session>>,
    servers: HashMap<String, MCPServer>,
    call_timeout: Duration,
}

impl McpHost {
    /// Spawn one child process per manifest entry, call `initialize`/`list_tools`
    /// on each, and cache the resulting [`MCPServer`] record.
    #[instrument(skip(manifest_path))]
    pub async fn spawn_all(manifest_path: impl AsRef<std::path::Path>) -> McpResult<Self> {
        let manifest = Manifest::load(manifest_path.as_ref()).map_err(|e| {
            McpError::new(McpErrorKind::Transport(format!(
                "failed to read manifest: {e}"
            )))
        })?;

        let mut sessions = HashMap::new();
        let mut servers = HashMap::new();

        for (name, entry) in manifest.mcp_servers {
            let description = Manifest::load_description(&entry).unwrap_or_default();
            let command = Self::build_command(&entry.path);

            info!(server = %name, path = %entry.path, "spawning MCP server");
            let transport = TokioChildProcess::new(command).map_err(|e| {
                McpError::new(McpErrorKind::SpawnFailed {
                    server: name.clone(),
                    reason: e.to_string(),
                })
            })?;

            let service = ().serve(transport).await.map_err(|e| {
                McpError::new(McpErrorKind::SpawnFailed {
                    server: name.clone(),
                    reason: format!("handshake failed: {e}"),
                })
            })?;

            let tools_result = service
                .list_tools(Default::default())
                .await
                .map_err(|e| McpError::new(McpErrorKind::Transport(e.to_string())))?;

            let tools = tools_result
                .tools
                .iter()
                .map(|t| {
                    let schema = serde_json::to_value(&t.input_schema)
                        .unwrap_or_else(|_| serde_json::json!({}));
                    MCPTool::new(
                        t.name.to_string(),
                        t.description.as_deref().unwrap_or_default().to_string(),
                        schema,
                    )
                })
                .collect::<Vec<_>>();

            debug!(server = %name, tool_count = tools.len(), "cached tool list");
            servers.insert(name.clone(), MCPServer::new(name.clone(), description, tools));
            sessions.insert(
                name,
                Arc::new(Session {
                    service,
                    lock: Mutex::new(()),
                }),
            );
        }

        Ok(Self {
            sessions,
            servers,
            call_timeout: DEFAULT_CALL_TOOL_TIMEOUT,
        })
    }

    fn build_command(path: &str) -> Command {
        let mut cmd = if path.ends_with(".py") {
            let mut c = Command::new("python");
            c.arg(path);
            c
        } else {
            let mut c = Command::new("node");
            c.arg(path);
            c
        };
        cmd.kill_on_drop(true);
        cmd
    }

    /// Override the default per-call timeout (tests use a short one).
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Cached catalog of spawned servers, as exposed by `get_servers` (spec.md §6).
    pub fn servers(&self) -> &HashMap<String, MCPServer> {
        &self.servers
    }

    /// Invoke `tool` on `server` with bare `{arg: value}` arguments. Safe to call
    /// concurrently across servers; calls against the same server queue behind
    /// `Session::lock`.
    #[instrument(skip(self, args))]
    pub async fn call_tool(
        &self,
        server: &str,
        tool: &str,
        args: HashMap<String, serde_json::Value>,
    ) -> McpResult<ToolCallResult> {
        let session = self
            .sessions
            .get(server)
            .ok_or_else(|| McpError::new(McpErrorKind::UnknownServer(server.to_string())))?
            .clone();

        let _permit = session.lock.lock().await;

        let arguments = serde_json::Map::from_iter(args);
        let params = CallToolRequestParam {
            name: tool.to_string().into(),
            arguments: Some(arguments),
        };

        let call = session.service.call_tool(params);
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(result)) => {
                let content = result
                    .content
                    .iter()
                    .filter_map(|c| {
                        serde_json::to_value(c)
                            .ok()
                            .and_then(|v| v.get("text").and_then(|t| t.as_str().map(String::from)))
                    })
                    .collect();
                Ok(ToolCallResult {
                    content,
                    is_error: result.is_error.unwrap_or(false),
                })
            }
            Ok(Err(e)) => {
                warn!(server, tool, error = %e, "tool call failed");
                Err(McpError::new(McpErrorKind::Transport(e.to_string())))
            }
            Err(_) => {
                error!(server, tool, "tool call timed out");
                Err(McpError::new(McpErrorKind::Timeout {
                    server: server.to_string(),
                    tool: tool.to_string(),
                }))
            }
        }
    }
}

#[async_trait]
impl ToolInvoker for McpHost {
    async fn call_tool(
        &self,
        server: &str,
        tool: &str,
        args: HashMap<String, serde_json::Value>,
    ) -> McpResult<ToolCallOutcome> {
        let result = McpHost::call_tool(self, server, tool, args).await?;
        Ok(ToolCallOutcome {
            content: result.content,
            is_error: result.is_error,
        })
    }
}
