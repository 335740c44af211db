//! YAML frontmatter for agent and command markdown files.
//!
//! A document carries frontmatter when its first line is `---` and a later
//! line closes the block with `---`. Frontmatter is exposed as a JSON object
//! so it can be handed to the frontend untouched.

use crate::error::{CcmError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub frontmatter: Map<String, Value>,
    pub body: String,
}

/// Split `raw` into `(yaml, body)` without parsing. `None` when there is no
/// well-formed frontmatter block.
pub fn split(raw: &str) -> Option<(&str, &str)> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER || !first.ends_with('\n') {
        return None;
    }
    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some((&text[yaml_start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a markdown document. Files without frontmatter parse to an empty
/// map; malformed YAML is an error.
pub fn parse(raw: &str) -> Result<Document> {
    match split(raw) {
        Some((yaml, body)) => Ok(Document {
            frontmatter: parse_yaml(yaml)?,
            body: body.to_string(),
        }),
        None => Ok(Document {
            frontmatter: Map::new(),
            body: raw.strip_prefix('\u{feff}').unwrap_or(raw).to_string(),
        }),
    }
}

fn parse_yaml(yaml: &str) -> Result<Map<String, Value>> {
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| CcmError::Frontmatter(e.to_string()))?;
    match yaml_to_json(value) {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(CcmError::Frontmatter(format!(
            "expected a mapping, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Convert YAML to JSON, stringifying non-string mapping keys.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Y;
    match value {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Bool(b),
        Y::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        Y::String(s) => Value::String(s),
        Y::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        Y::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(k, v)| (key_string(k), yaml_to_json(v)))
                .collect(),
        ),
        Y::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Render frontmatter and body back into a markdown document.
pub fn render(frontmatter: &Map<String, Value>, body: &str) -> Result<String> {
    let mut out = String::from("---\n");
    if !frontmatter.is_empty() {
        let yaml = serde_yaml::to_string(frontmatter)?;
        out.push_str(&yaml);
        if !yaml.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str("---\n");
    let body = body.trim();
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        out.push('\n');
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

static HEADING_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    HEADING_RE.get_or_init(|| Regex::new(r"^#+\s*").unwrap())
}

/// First non-empty body line with markdown heading markers removed.
pub fn first_content_line(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && *l != DELIMITER)
        .map(|l| heading_re().replace(l, "").trim().to_string())
        .filter(|l| !l.is_empty())
}

/// A scalar field as a string. Numbers and booleans are stringified, blank
/// strings count as absent.
pub fn string_field(frontmatter: &Map<String, Value>, key: &str) -> Option<String> {
    match frontmatter.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A list field given either as a YAML sequence or a comma-separated string.
pub fn list_field(frontmatter: &Map<String, Value>, key: &str) -> Vec<String> {
    match frontmatter.get(key) {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
