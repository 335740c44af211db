use crate::error::Result;
use crate::frontmatter::{self, list_field, string_field};
use crate::parsed::Parsed;
use crate::scope::Scope;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

pub const DEFAULT_MODEL: &str = "inherit";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A subagent definition from `.claude/agents/<id>.md`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// File stem, used in URLs.
    pub id: String,
    pub name: String,
    pub file: String,
    pub path: String,
    pub scope: Scope,
    pub description: String,
    pub model: String,
    pub tools: Vec<String>,
    pub color: Option<String>,
    pub frontmatter: Map<String, Value>,
    /// System prompt (markdown body), trimmed.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one agent file from its raw text.
pub fn parse_agent(path: &Path, raw: &str, scope: Scope) -> Result<Agent> {
    let doc = frontmatter::parse(raw)?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let fm = doc.frontmatter;

    Ok(Agent {
        name: string_field(&fm, "name").unwrap_or_else(|| id.clone()),
        description: string_field(&fm, "description").unwrap_or_default(),
        model: string_field(&fm, "model").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        tools: list_field(&fm, "tools"),
        color: string_field(&fm, "color"),
        content: doc.body.trim().to_string(),
        id,
        file,
        path: path.display().to_string(),
        scope,
        frontmatter: fm,
    })
}

/// Read a single agent file from disk.
pub fn read_agent(path: &Path, scope: Scope) -> Result<Agent> {
    let raw = std::fs::read_to_string(path)?;
    parse_agent(path, &raw, scope)
}

/// Load every `*.md` agent directly inside `dir` (no recursion).
///
/// A missing directory yields an empty result. Files that cannot be read or
/// whose frontmatter is malformed become warnings.
pub fn load_agents(dir: &Path, scope: Scope) -> Parsed<Agent> {
    let mut out = Parsed::new();
    if !dir.is_dir() {
        return out;
    }

    let mut entries: Vec<_> = match std::fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(e) => {
            out.skip(dir, e);
            return out;
        }
    };
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        match read_agent(&path, scope) {
            Ok(agent) => out.items.push(agent),
            Err(e) => out.skip(&path, e),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
