//! MCP server manifest parsing (`MCP_SERVERS_JSON`, spec.md §6).

use conductor_error::{ConfigError, ConfigErrorKind, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One entry in the manifest: where to find the server and its human description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerManifestEntry {
    /// Path to the server's entry point, e.g. `servers/web_fetcher.py`.
    pub path: String,
    /// Path to a text file with the server's human-readable description.
    pub description: String,
}

/// The manifest root: `{"mcpServers": {name: {path, description}}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: HashMap<String, ServerManifestEntry>,
}

impl Manifest {
    /// Read and parse the manifest at `path`. Failure here is fatal per spec.md §7
    /// ("manifest unreadable at startup" -> process exits non-zero); callers should
    /// propagate this error out of `main`.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(ConfigErrorKind::ManifestUnreadable(format!(
                "{}: {e}",
                path.display()
            )))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ConfigError::new(ConfigErrorKind::ManifestUnreadable(format!(
                "{}: {e}",
                path.display()
            )))
        })
    }

    /// Load the description file for `entry`, trimmed of trailing whitespace.
    pub fn load_description(entry: &ServerManifestEntry) -> ConfigResult<String> {
        std::fs::read_to_string(&entry.description)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::ManifestUnreadable(format!(
                    "{}: {e}",
                    entry.description
                )))
            })
    }
}
