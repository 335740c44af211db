//! Creating and updating agent files.

use crate::agent::{parse_agent, Agent};
use crate::error::{CcmError, FieldError, Result};
use crate::frontmatter;
use crate::io;
use crate::scope::Scope;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

pub const VALID_MODELS: &[&str] = &[
    "inherit",
    "sonnet",
    "opus",
    "haiku",
    "claude-sonnet",
    "claude-opus",
    "claude-haiku",
];

pub const VALID_COLORS: &[&str] = &[
    "red", "blue", "green", "yellow", "purple", "orange", "pink", "cyan",
];

/// Keys the writer owns. Extra frontmatter can never replace these.
const CORE_KEYS: &[&str] = &["name", "description", "model", "tools", "color"];

static AGENT_ID_RE: OnceLock<Regex> = OnceLock::new();

fn agent_id_re() -> &'static Regex {
    AGENT_ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap())
}

/// Reject ids that could escape the agents directory.
pub fn validate_agent_id(id: &str) -> Result<()> {
    if agent_id_re().is_match(id) {
        Ok(())
    } else {
        Err(CcmError::InvalidAgentId(id.to_string()))
    }
}

/// Body of an agent create/update request.
///
/// `tools` and `color` stay loosely typed so a wrong shape is reported as a
/// field error instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tools: Option<Value>,
    #[serde(default)]
    pub color: Option<Value>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default, alias = "yamlFrontmatter")]
    pub extra_frontmatter: Option<Map<String, Value>>,
}

fn blank(v: &Option<String>) -> bool {
    v.as_deref().map_or(true, |s| s.trim().is_empty())
}

impl AgentUpdate {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if blank(&self.name) {
            errors.push(FieldError::new(
                "name",
                "Name is required and must be a non-empty string",
            ));
        }
        if blank(&self.description) {
            errors.push(FieldError::new(
                "description",
                "Description is required and must be a non-empty string",
            ));
        }
        match self.model.as_deref().map(str::trim) {
            None | Some("") => errors.push(FieldError::new(
                "model",
                "Model is required and must be a non-empty string",
            )),
            Some(m) if !VALID_MODELS.contains(&m) => errors.push(
                FieldError::new(
                    "model",
                    format!("Model must be one of: {}", VALID_MODELS.join(", ")),
                )
                .with_valid_values(VALID_MODELS),
            ),
            Some(_) => {}
        }

        match &self.tools {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
            Some(Value::Array(_)) => {
                errors.push(FieldError::new("tools", "All tools must be strings"))
            }
            Some(_) => errors.push(FieldError::new(
                "tools",
                "Tools must be an array of strings",
            )),
        }

        match &self.color {
            None | Some(Value::Null) => {}
            Some(Value::String(c)) if c.is_empty() => {}
            Some(Value::String(c)) if VALID_COLORS.contains(&c.as_str()) => {}
            Some(Value::String(_)) => errors.push(
                FieldError::new(
                    "color",
                    format!("Color must be one of: {}", VALID_COLORS.join(", ")),
                )
                .with_valid_values(VALID_COLORS),
            ),
            Some(_) => errors.push(FieldError::new("color", "Color must be a string")),
        }

        errors
    }

    fn tool_list(&self) -> Vec<String> {
        match &self.tools {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn color_str(&self) -> Option<&str> {
        self.color
            .as_ref()
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
    }

    /// Frontmatter in the order it is written: core fields, then extras.
    fn frontmatter(&self) -> Map<String, Value> {
        let mut fm = Map::new();
        let text = |v: &Option<String>| Value::String(v.as_deref().unwrap_or("").trim().to_string());
        fm.insert("name".into(), text(&self.name));
        fm.insert("description".into(), text(&self.description));
        fm.insert("model".into(), text(&self.model));
        let tools = self.tool_list();
        if !tools.is_empty() {
            fm.insert(
                "tools".into(),
                Value::Array(tools.into_iter().map(Value::String).collect()),
            );
        }
        if let Some(color) = self.color_str() {
            fm.insert("color".into(), Value::String(color.to_string()));
        }
        if let Some(extra) = &self.extra_frontmatter {
            for (k, v) in extra {
                if !CORE_KEYS.contains(&k.as_str()) {
                    fm.insert(k.clone(), v.clone());
                }
            }
        }
        fm
    }
}

/// Validate `update` and write it to `path`, returning the agent as re-read
/// from the new file.
///
/// Without a `system_prompt` the existing file's body is kept, so metadata
/// edits never drop the prompt.
pub fn write_agent(path: &Path, update: &AgentUpdate, scope: Scope) -> Result<Agent> {
    let errors = update.validate();
    if !errors.is_empty() {
        return Err(CcmError::Validation(errors));
    }

    let body = match &update.system_prompt {
        Some(prompt) => prompt.clone(),
        None => existing_body(path)?,
    };
    let rendered = frontmatter::render(&update.frontmatter(), &body)?;
    io::atomic_write(path, rendered.as_bytes())?;
    info!(path = %path.display(), "wrote agent");

    parse_agent(path, &rendered, scope)
}

fn existing_body(path: &Path) -> Result<String> {
    let Some(raw) = io::read_optional(path)? else {
        return Ok(String::new());
    };
    // An unparseable header still leaves a usable body.
    Ok(match frontmatter::parse(&raw) {
        Ok(doc) => doc.body,
        Err(_) => frontmatter::split(&raw)
            .map(|(_, body)| body.to_string())
            .unwrap_or(raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn update(v: Value) -> AgentUpdate {
        serde_json::from_value(v).unwrap()
    }

    fn valid() -> Value {
        json!({
            "name": "reviewer",
            "description": "Reviews pull requests",
            "model": "sonnet",
            "tools": ["Read", "Grep"],
            "color": "blue"
        })
    }

    #[test]
    fn agent_ids() {
        assert!(validate_agent_id("code-reviewer_2").is_ok());
        for bad in ["", "../etc", "a/b", "a b", "x.md"] {
            assert!(
                matches!(validate_agent_id(bad), Err(CcmError::InvalidAgentId(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn valid_update_has_no_errors() {
        assert!(update(valid()).validate().is_empty());
    }

    #[test]
    fn missing_required_fields() {
        let errors = update(json!({ "name": "  " })).validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "description", "model"]);
    }

    #[test]
    fn bad_model_and_color_list_valid_values() {
        let mut v = valid();
        v["model"] = json!("gpt-4");
        v["color"] = json!("magenta");
        let errors = update(v).validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "model");
        assert!(errors[0].valid_values.as_ref().unwrap().contains(&"opus".to_string()));
        assert_eq!(errors[1].field, "color");
        assert_eq!(errors[1].valid_values.as_ref().unwrap().len(), VALID_COLORS.len());
    }

    #[test]
    fn bad_tool_shapes() {
        let mut v = valid();
        v["tools"] = json!("Read, Grep");
        assert_eq!(update(v.clone()).validate()[0].message, "Tools must be an array of strings");
        v["tools"] = json!(["Read", 3]);
        assert_eq!(update(v).validate()[0].message, "All tools must be strings");
    }

    #[test]
    fn write_new_agent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".claude/agents/reviewer.md");
        let mut v = valid();
        v["systemPrompt"] = json!("You review code.");
        v["yamlFrontmatter"] = json!({ "name": "ignored", "priority": 2 });

        let agent = write_agent(&path, &update(v), Scope::Project).unwrap();
        assert_eq!(agent.id, "reviewer");
        assert_eq!(agent.name, "reviewer");
        assert_eq!(agent.model, "sonnet");
        assert_eq!(agent.tools, vec!["Read", "Grep"]);
        assert_eq!(agent.color.as_deref(), Some("blue"));
        assert_eq!(agent.content, "You review code.");
        assert_eq!(agent.frontmatter["priority"], json!(2));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("---\nname: reviewer\ndescription: Reviews pull requests\n"));
        assert!(raw.ends_with("\nYou review code.\n"));
    }

    #[test]
    fn update_preserves_existing_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reviewer.md");
        std::fs::write(&path, "---\nname: old\nmodel: opus\n---\n\nKeep this prompt.\n").unwrap();

        let agent = write_agent(&path, &update(valid()), Scope::User).unwrap();
        assert_eq!(agent.name, "reviewer");
        assert_eq!(agent.content, "Keep this prompt.");
        assert_eq!(agent.scope, Scope::User);
    }

    #[test]
    fn invalid_update_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.md");
        let err = write_agent(&path, &update(json!({})), Scope::Project).unwrap_err();
        assert!(matches!(err, CcmError::Validation(ref e) if e.len() == 3));
        assert!(!path.exists());
    }
}
