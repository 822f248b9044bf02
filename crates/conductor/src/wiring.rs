//! Wires the configured back-ends into the engine crates and a ready-to-serve
//! [`AppState`] (spec.md §2, §6).

use crate::config::Settings;
use conductor_engine::{AdminHandler, ExecutionEngine, Planner};
use conductor_error::ConfigResult;
use conductor_llm::OpenAiChatBackend;
use conductor_mcp::McpHost;
use conductor_persistence::HttpPersistenceClient;
use conductor_server::AppState;
use conductor_socket::SocketClient;
use std::sync::Arc;
use tracing::info;

/// Builds every engine component from `settings` and returns the [`AppState`]
/// `conductor_server::create_router` expects.
///
/// `conductor_security::ApprovalRegistry` (spec.md §4.8's approval idempotency
/// store) is owned internally by `ExecutionEngine`, not wired here.
pub async fn build_app_state(settings: &Settings) -> ConfigResult<AppState> {
    info!(manifest = %settings.mcp_servers_json.display(), "spawning MCP servers");
    let host = McpHost::spawn_all(&settings.mcp_servers_json)
        .await
        .map_err(|e| conductor_error::ConfigError::new(conductor_error::ConfigErrorKind::ManifestUnreadable(e.to_string())))?;
    let servers = Arc::new(host.servers().clone());
    let tools: Arc<dyn conductor_interface::ToolInvoker> = Arc::new(host);

    let persistence: Arc<dyn conductor_interface::PersistenceBackend> =
        Arc::new(HttpPersistenceClient::new(settings.client_url.clone()));

    let transport: Arc<dyn conductor_interface::ChatTransport> =
        Arc::new(SocketClient::connect(settings.socket_server_url.clone(), settings.agent_user_id.clone()));

    let llm: Arc<dyn conductor_interface::LlmChatBackend> = Arc::new(OpenAiChatBackend::new(
        settings.openai_api_key.clone(),
        settings.openai_model.clone(),
        settings.openai_api_base_url.clone(),
    ));

    let execution = Arc::new(ExecutionEngine::new(
        persistence.clone(),
        transport.clone(),
        llm.clone(),
        tools,
        servers.clone(),
    ));
    let planner = Arc::new(Planner::new(
        persistence.clone(),
        transport.clone(),
        llm.clone(),
        servers.clone(),
        execution.clone(),
    ));
    let admin = Arc::new(AdminHandler::new(persistence, transport, llm, servers.clone(), execution.clone()));

    Ok(AppState {
        planner,
        admin,
        execution,
        servers,
        default_assignee: settings.default_assignee.clone(),
    })
}
