use crate::io;
use crate::parsed::Parsed;
use crate::scope::Scope;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// An MCP server definition. Nothing here ever connects to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    pub name: String,
    /// `stdio`, `http`, `sse`, or whatever explicit value the file declared.
    pub transport: String,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub env: Map<String, Value>,
    pub url: Option<String>,
    pub headers: Map<String, Value>,
    pub enabled: bool,
    pub scope: Scope,
    pub source: String,
    pub file_path: String,
}

/// Work out the transport for a server entry.
///
/// An explicit `type` or `transport` wins. Otherwise a URL means `http`, a
/// command means `stdio`, and an `sse`/`eventSource` key means `sse`.
pub fn detect_transport(config: &Map<String, Value>) -> String {
    let explicit = ["type", "transport"]
        .iter()
        .filter_map(|k| config.get(*k).and_then(Value::as_str))
        .map(|s| s.trim().to_lowercase())
        .find(|s| !s.is_empty());
    if let Some(t) = explicit {
        return t;
    }
    let has = |k: &str| config.get(k).is_some_and(|v| !v.is_null());
    if has("url") || has("endpoint") {
        "http".to_string()
    } else if has("command") {
        "stdio".to_string()
    } else if has("sse") || has("eventSource") {
        "sse".to_string()
    } else {
        "stdio".to_string()
    }
}

fn server(name: &str, config: &Map<String, Value>, scope: Scope, source: &str, path: &Path) -> McpServer {
    let object = |k: &str| {
        config
            .get(k)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    };
    McpServer {
        name: name.to_string(),
        transport: detect_transport(config),
        command: config.get("command").and_then(Value::as_str).map(str::to_string),
        args: config
            .get("args")
            .and_then(Value::as_array)
            .map(|a| {
                a.iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        env: object("env"),
        url: ["url", "endpoint"]
            .iter()
            .find_map(|k| config.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        headers: object("headers"),
        enabled: config.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        scope,
        source: source.to_string(),
        file_path: path.display().to_string(),
    }
}

fn parse_servers(
    servers: &Map<String, Value>,
    path: &Path,
    scope: Scope,
    source: &str,
    out: &mut Parsed<McpServer>,
) {
    for (name, config) in servers {
        match config.as_object() {
            Some(config) => out.items.push(server(name, config, scope, source, path)),
            None => out.skip(path, format!("mcpServers.{name} must be an object")),
        }
    }
}

fn read(path: &Path, out: &mut Parsed<McpServer>) -> Option<Map<String, Value>> {
    match io::read_json(path) {
        Ok(Some(Value::Object(root))) => Some(root),
        Ok(Some(_)) => {
            out.skip(path, "root must be a JSON object");
            None
        }
        Ok(None) => None,
        Err(e) => {
            out.skip(path, e);
            None
        }
    }
}

/// Servers from a project's `.mcp.json`.
///
/// The canonical layout is `{ "mcpServers": { ... } }`; a bare object of
/// server objects is accepted too.
pub fn load_mcp_json(path: &Path, scope: Scope, source: &str) -> Parsed<McpServer> {
    let mut out = Parsed::new();
    let Some(root) = read(path, &mut out) else {
        return out;
    };
    match root.get("mcpServers") {
        Some(Value::Object(servers)) => parse_servers(servers, path, scope, source, &mut out),
        Some(_) => out.skip(path, "mcpServers must be an object"),
        None if root.values().all(Value::is_object) => {
            parse_servers(&root, path, scope, source, &mut out)
        }
        None => {}
    }
    out
}

/// Servers from the `mcpServers` key of a settings file or `~/.claude.json`.
pub fn load_mcp_settings(path: &Path, scope: Scope, source: &str) -> Parsed<McpServer> {
    let mut out = Parsed::new();
    let Some(root) = read(path, &mut out) else {
        return out;
    };
    match root.get("mcpServers") {
        Some(Value::Object(servers)) => parse_servers(servers, path, scope, source, &mut out),
        None | Some(Value::Null) => {}
        Some(_) => out.skip(path, "mcpServers must be an object"),
    }
    out
}

/// Partition servers into `(enabled, disabled)`.
pub fn split_by_enabled(servers: &[McpServer]) -> (Vec<&McpServer>, Vec<&McpServer>) {
    servers.iter().partition(|s| s.enabled)
}
