//! Hooks from `settings.json` / `settings.local.json`.
//!
//! Current Claude Code settings key hooks by lifecycle event:
//!
//! ```json
//! { "hooks": { "PreToolUse": [ { "matcher": "Bash", "hooks": [ { "type": "command", "command": "lint.sh" } ] } ] } }
//! ```
//!
//! Older files used a flat array of `{ "event", "matcher", "hooks" | "command" }`
//! entries; both are accepted.

use crate::io;
use crate::parsed::Parsed;
use crate::scope::Scope;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

pub const DEFAULT_MATCHER: &str = "*";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: Option<String>,
    pub timeout: Option<u64>,
    pub enabled: bool,
}

/// One matcher group bound to an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    pub event: String,
    pub matcher: String,
    /// Position of this matcher group within its event (or within the legacy array).
    pub matcher_index: usize,
    pub hooks: Vec<HookAction>,
    pub scope: Scope,
    /// Display label of the settings file, e.g. `settings.local.json`.
    pub source: String,
    pub file_path: String,
}

/// Load hooks from one settings file. A missing file is empty; invalid JSON
/// is a single warning.
pub fn load_hooks(path: &Path, scope: Scope, source: &str) -> Parsed<Hook> {
    match io::read_json(path) {
        Ok(Some(settings)) => parse_hooks(&settings, path, scope, source),
        Ok(None) => Parsed::new(),
        Err(e) => {
            let mut out = Parsed::new();
            out.skip(path, e);
            out
        }
    }
}

/// Extract hooks from an already-parsed settings document.
pub fn parse_hooks(settings: &Value, path: &Path, scope: Scope, source: &str) -> Parsed<Hook> {
    let mut out = Parsed::new();
    let Some(root) = settings.as_object() else {
        out.skip(path, "settings root must be a JSON object");
        return out;
    };
    let ctx = Ctx {
        path,
        scope,
        source,
    };

    match root.get("hooks") {
        None | Some(Value::Null) => {}
        Some(Value::Object(events)) => {
            for (event, matchers) in events {
                let Some(matchers) = matchers.as_array() else {
                    out.skip(path, format!("hooks.{event} must be an array of matchers"));
                    continue;
                };
                for (index, entry) in matchers.iter().enumerate() {
                    match entry.as_object() {
                        Some(entry) => match ctx.hook(event, index, entry) {
                            Ok(hook) => out.items.push(hook),
                            Err(msg) => out.skip(path, format!("hooks.{event}[{index}]: {msg}")),
                        },
                        None => out.skip(path, format!("hooks.{event}[{index}] must be an object")),
                    }
                }
            }
        }
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                let Some(entry) = entry.as_object() else {
                    out.skip(path, format!("hooks[{index}] must be an object"));
                    continue;
                };
                let Some(event) = entry.get("event").and_then(Value::as_str) else {
                    out.skip(path, format!("hooks[{index}] is missing an event name"));
                    continue;
                };
                match ctx.hook(event, index, entry) {
                    Ok(hook) => out.items.push(hook),
                    Err(msg) => out.skip(path, format!("hooks[{index}]: {msg}")),
                }
            }
        }
        Some(_) => out.skip(path, "hooks must be an object keyed by event name"),
    }
    out
}

struct Ctx<'a> {
    path: &'a Path,
    scope: Scope,
    source: &'a str,
}

impl Ctx<'_> {
    fn hook(
        &self,
        event: &str,
        index: usize,
        entry: &Map<String, Value>,
    ) -> std::result::Result<Hook, String> {
        let matcher = entry
            .get("matcher")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MATCHER)
            .to_string();

        let hooks = match entry.get("hooks") {
            Some(Value::Array(actions)) => actions
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    a.as_object()
                        .map(action)
                        .ok_or_else(|| format!("hooks[{i}] must be an object"))
                })
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Some(_) => return Err("hooks must be an array".to_string()),
            None if entry.contains_key("command") => vec![action(entry)],
            None => Vec::new(),
        };

        Ok(Hook {
            event: event.to_string(),
            matcher,
            matcher_index: index,
            hooks,
            scope: self.scope,
            source: self.source.to_string(),
            file_path: self.path.display().to_string(),
        })
    }
}

fn action(obj: &Map<String, Value>) -> HookAction {
    HookAction {
        kind: obj
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("command")
            .to_string(),
        command: obj.get("command").and_then(Value::as_str).map(str::to_string),
        timeout: obj.get("timeout").and_then(Value::as_u64),
        enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
    }
}

/// Number of individual hook actions, the figure shown on project cards.
pub fn action_count(hooks: &[Hook]) -> usize {
    hooks.iter().map(|h| h.hooks.len().max(1)).sum()
}

/// Group hooks by event, keeping the order events were first seen.
pub fn group_by_event(hooks: &[Hook]) -> Vec<(String, Vec<&Hook>)> {
    let mut groups: Vec<(String, Vec<&Hook>)> = Vec::new();
    for hook in hooks {
        match groups.iter_mut().find(|(event, _)| *event == hook.event) {
            Some((_, list)) => list.push(hook),
            None => groups.push((hook.event.clone(), vec![hook])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn parse(v: Value) -> Parsed<Hook> {
        parse_hooks(&v, Path::new("/p/.claude/settings.json"), Scope::Project, "settings.json")
    }

    #[test]
    fn parses_event_keyed_hooks() {
        let parsed = parse(json!({
            "hooks": {
                "PreToolUse": [
                    { "matcher": "Bash", "hooks": [ { "type": "command", "command": "lint.sh", "timeout": 30 } ] },
                    { "hooks": [ { "command": "audit.sh", "enabled": false } ] }
                ],
                "Stop": [ { "matcher": "", "hooks": [ { "type": "command", "command": "notify" } ] } ]
            }
        }));
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.items.len(), 3);

        let first = &parsed.items[0];
        assert_eq!(first.event, "PreToolUse");
        assert_eq!(first.matcher, "Bash");
        assert_eq!(first.matcher_index, 0);
        assert_eq!(first.hooks[0].command.as_deref(), Some("lint.sh"));
        assert_eq!(first.hooks[0].timeout, Some(30));
        assert_eq!(first.source, "settings.json");

        let second = &parsed.items[1];
        assert_eq!(second.matcher, DEFAULT_MATCHER);
        assert_eq!(second.matcher_index, 1);
        assert_eq!(second.hooks[0].kind, "command");
        assert!(!second.hooks[0].enabled);

        assert_eq!(parsed.items[2].matcher, DEFAULT_MATCHER);
    }

    #[test]
    fn parses_legacy_array_format() {
        let parsed = parse(json!({
            "hooks": [
                { "event": "PostToolUse", "matcher": "Edit", "command": "fmt.sh" },
                { "matcher": "no-event" }
            ]
        }));
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].event, "PostToolUse");
        assert_eq!(parsed.items[0].hooks[0].command.as_deref(), Some("fmt.sh"));
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].error.contains("missing an event"));
    }

    #[test]
    fn bad_entries_warn_without_dropping_good_ones() {
        let parsed = parse(json!({
            "hooks": {
                "PreToolUse": "not-an-array",
                "Stop": [ 42, { "hooks": "nope" }, { "hooks": [ { "command": "ok" } ] } ]
            }
        }));
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].event, "Stop");
        assert_eq!(parsed.items[0].matcher_index, 2);
        assert_eq!(parsed.warnings.len(), 3);
    }

    #[test]
    fn missing_hooks_key_is_empty() {
        let parsed = parse(json!({ "permissions": {} }));
        assert!(parsed.items.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn malformed_json_file_is_one_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ \"hooks\": { \"Stop\": [ } ").unwrap();
        let parsed = load_hooks(&path, Scope::Project, "settings.json");
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].file.ends_with("settings.json"));
        assert!(parsed.warnings[0].error.contains("Invalid JSON"));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let parsed = load_hooks(&dir.path().join("settings.json"), Scope::User, "~/.claude/settings.json");
        assert!(parsed.items.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn grouping_and_counting() {
        let parsed = parse(json!({
            "hooks": {
                "Stop": [ { "hooks": [ { "command": "a" }, { "command": "b" } ] } ],
                "PreToolUse": [ { "matcher": "Bash", "hooks": [ { "command": "c" } ] } ]
            }
        }));
        assert_eq!(action_count(&parsed.items), 3);
        let groups = group_by_event(&parsed.items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Stop");
    }
}
