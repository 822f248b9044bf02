//! Skill argument schema enrichment (spec.md §4.3, Testable Property 6).

use conductor_core::{MCPServer, SkillArg};
use serde_json::Value;
use std::collections::HashMap;

/// Enrich each raw function-call argument with its schema type (or, absent a
/// schema entry, the type inferred from the value's own kind), plus a title
/// and description. Mirrors the original's `create_inferred_arg_info`.
pub fn enrich_args(
    server: &MCPServer,
    tool_name: &str,
    raw_args: &serde_json::Map<String, Value>,
) -> HashMap<String, SkillArg> {
    let schema = server.tool(tool_name).map(|t| t.input_schema());
    let properties = schema.and_then(|s| s.get("properties")).and_then(|p| p.as_object());

    raw_args
        .iter()
        .map(|(name, value)| {
            let arg = match properties.and_then(|p| p.get(name)) {
                Some(prop) => enrich_from_schema(name, value, prop),
                None => infer_arg(name, value),
            };
            (name.clone(), arg)
        })
        .collect()
}

fn enrich_from_schema(name: &str, value: &Value, prop: &Value) -> SkillArg {
    let mut ty = prop
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or("unknown")
        .to_string();

    if ty == "array" {
        let item_type = prop
            .get("items")
            .and_then(|i| i.get("type"))
            .and_then(|t| t.as_str())
            .unwrap_or("unknown");
        ty = format!("array[{item_type}]");
    }

    SkillArg {
        value: value.clone(),
        ty,
        title: prop
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or(name)
            .to_string(),
        description: prop
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("")
            .to_string(),
    }
}

fn infer_arg(name: &str, value: &Value) -> SkillArg {
    let ty = match value {
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    };
    SkillArg {
        value: value.clone(),
        ty: ty.to_string(),
        title: name.to_string(),
        description: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_core::MCPTool;
    use serde_json::json;

    fn server() -> MCPServer {
        MCPServer::new(
            "fs",
            "filesystem tools",
            vec![MCPTool::new(
                "write_text_to_file",
                "Write text to a file",
                json!({
                    "type": "object",
                    "properties": {
                        "file_path": {"type": "string", "title": "Path", "description": "target path"},
                        "tags": {"type": "array", "items": {"type": "string"}},
                    }
                }),
            )],
        )
    }

    #[test]
    fn schema_type_wins_when_present() {
        let mut raw = serde_json::Map::new();
        raw.insert("file_path".into(), json!("/tmp/a"));
        let enriched = enrich_args(&server(), "write_text_to_file", &raw);
        assert_eq!(enriched["file_path"].ty, "string");
        assert_eq!(enriched["file_path"].title, "Path");
    }

    #[test]
    fn array_type_carries_item_type() {
        let mut raw = serde_json::Map::new();
        raw.insert("tags".into(), json!(["a", "b"]));
        let enriched = enrich_args(&server(), "write_text_to_file", &raw);
        assert_eq!(enriched["tags"].ty, "array[string]");
    }

    #[test]
    fn unknown_arg_falls_back_to_inferred_kind() {
        let mut raw = serde_json::Map::new();
        raw.insert("extra".into(), json!({"nested": true}));
        let enriched = enrich_args(&server(), "write_text_to_file", &raw);
        assert_eq!(enriched["extra"].ty, "object");
    }

    #[test]
    fn null_value_infers_null_type() {
        let mut raw = serde_json::Map::new();
        raw.insert("extra".into(), Value::Null);
        let enriched = enrich_args(&server(), "write_text_to_file", &raw);
        assert_eq!(enriched["extra"].ty, "null");
    }
}
