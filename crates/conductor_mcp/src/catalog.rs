//! Tool Catalog: projects a server's tools into LLM-facing "function" descriptors
//! (spec.md §4.2).

use conductor_core::MCPServer;
use serde_json::{Value, json};

/// Build the `{type:"function", function:{name, description, parameters}}` array
/// consumed by `conductor_llm`'s chat backend as the `tools` parameter.
pub fn function_descriptors(server: &MCPServer) -> Vec<Value> {
    server
        .tools()
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.input_schema(),
                }
            })
        })
        .collect()
}

/// Build the presentation text for one server: its description postfixed with a
/// bullet list of its tools (name + first line of description), used when
/// presenting the catalog to the planner.
pub fn describe_server(server: &MCPServer) -> String {
    let mut out = server.description().to_string();
    for tool in server.tools() {
        let first_line = tool.description().lines().next().unwrap_or("");
        out.push_str(&format!("\n- {}: {}", tool.name(), first_line));
    }
    out
}

/// Build `{name -> [function descriptors]}` across every server, for `get_tools`
/// (with an optional single-server filter) and for presenting the full catalog.
pub fn all_function_descriptors<'a>(
    servers: impl Iterator<Item = &'a MCPServer>,
) -> std::collections::HashMap<String, Vec<Value>> {
    servers
        .map(|s| (s.name().to_string(), function_descriptors(s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::MCPTool;

    fn server() -> MCPServer {
        MCPServer::new(
            "web_fetcher",
            "Fetches web pages.",
            vec![MCPTool::new(
                "fetch",
                "Fetch a URL.\nReturns raw bytes.",
                json!({"type": "object", "properties": {"url": {"type": "string"}}}),
            )],
        )
    }

    #[test]
    fn descriptor_shape_matches_openai_function_calling() {
        let descriptors = function_descriptors(&server());
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0]["type"], "function");
        assert_eq!(descriptors[0]["function"]["name"], "fetch");
    }

    #[test]
    fn describe_server_postfixes_bullet_list_with_first_line_only() {
        let text = describe_server(&server());
        assert!(text.contains("Fetches web pages."));
        assert!(text.contains("- fetch: Fetch a URL."));
        assert!(!text.contains("Returns raw bytes."));
    }
}
