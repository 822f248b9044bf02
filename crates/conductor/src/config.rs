//! `Settings`: the orchestrator's recognized environment configuration
//! (spec.md §6 "Environment configuration").

use clap::Parser;
use conductor_error::{ConfigError, ConfigErrorKind, ConfigResult};
use std::path::PathBuf;

/// Agent orchestration engine: serves the plan/admin/perform HTTP API and
/// bridges it to a realtime chat bus and a fleet of MCP tool subprocesses.
#[derive(Parser, Debug)]
#[command(name = "conductor", version, about)]
pub struct Settings {
    /// Primary chat/completion model API key.
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: String,

    /// Primary chat/completion model base URL.
    #[arg(long, env = "OPENAI_API_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_api_base_url: String,

    /// Primary chat/completion model name.
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub openai_model: String,

    /// Embedding/bypasser model backend base URL.
    #[arg(long, env = "OLLAMA_API_BASE_URL", default_value = "http://localhost:11434")]
    pub ollama_api_base_url: String,

    /// Embedding model name served by the bypasser backend.
    #[arg(long, env = "EMBED_MODEL", default_value = "nomic-embed-text")]
    pub embed_model: String,

    /// Chat model name served by the bypasser backend.
    #[arg(long, env = "OLLAMA_MODEL", default_value = "llama3")]
    pub ollama_model: String,

    /// Path to the MCP server manifest (`{mcpServers: {name: {path, description}}}`).
    #[arg(long, env = "MCP_SERVERS_JSON")]
    pub mcp_servers_json: PathBuf,

    /// Persistence service base URL.
    #[arg(long, env = "CLIENT_URL")]
    pub client_url: String,

    /// Realtime chat bus base URL.
    #[arg(long, env = "SOCKET_SERVER_URL")]
    pub socket_server_url: String,

    /// User id the agent authenticates to the chat bus as.
    #[arg(long, env = "AGENT_USER_ID")]
    pub agent_user_id: String,

    /// User id newly created plans are assigned to when a caller doesn't name one.
    #[arg(long, env = "DEFAULT_ASSIGNEE", default_value = "agent")]
    pub default_assignee: String,

    /// Address the HTTP API binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,
}

impl Settings {
    /// Load `.env` (if present) then parse `Settings` from the environment.
    /// Failure here is fatal per spec.md §7 ("manifest unreadable at startup");
    /// callers propagate this straight out of `main`.
    pub fn load() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::try_parse().map_err(|e| ConfigError::new(ConfigErrorKind::InvalidVar {
            var: "(see message)".to_string(),
            reason: e.to_string(),
        }))
    }
}
