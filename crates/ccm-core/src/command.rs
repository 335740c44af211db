use crate::error::{CcmError, Result};
use crate::frontmatter::{self, first_content_line, list_field, string_field};
use crate::parsed::Parsed;
use crate::paths::to_slash;
use crate::scope::Scope;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use walkdir::WalkDir;

/// A slash command from `.claude/commands/**/*.md`.
///
/// Nested directories namespace the command: `git/commit.md` is invoked as
/// `/git:commit` and reported with `name = "git/commit"`, `namespace = "git"`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,
    pub namespace: Option<String>,
    /// Path relative to the commands directory, `/`-separated.
    pub file: String,
    pub path: String,
    pub scope: Scope,
    pub description: String,
    pub argument_hint: Option<String>,
    pub allowed_tools: Vec<String>,
    pub model: Option<String>,
    pub frontmatter: Map<String, Value>,
    pub content: String,
}

/// Parse one command. `rel` is the file path relative to the commands dir.
pub fn parse_command(path: &Path, rel: &Path, raw: &str, scope: Scope) -> Result<Command> {
    let doc = frontmatter::parse(raw)?;
    let fm = doc.frontmatter;
    let file = to_slash(rel);
    let name = file.strip_suffix(".md").unwrap_or(&file).to_string();
    let namespace = rel
        .parent()
        .map(to_slash)
        .filter(|ns| !ns.is_empty());
    let description = string_field(&fm, "description")
        .or_else(|| first_content_line(&doc.body))
        .unwrap_or_default();

    Ok(Command {
        name,
        namespace,
        file,
        path: path.display().to_string(),
        scope,
        description,
        argument_hint: hint_field(&fm),
        allowed_tools: list_field(&fm, "allowed-tools"),
        model: string_field(&fm, "model"),
        content: doc.body.trim().to_string(),
        frontmatter: fm,
    })
}

/// `argument-hint: [message]` is written unquoted in most command files, which
/// YAML reads as a one-element list. Render it back the way it was typed.
fn hint_field(fm: &Map<String, Value>) -> Option<String> {
    match fm.get("argument-hint")? {
        Value::Array(_) => Some(format!("[{}]", list_field(fm, "argument-hint").join(", "))),
        _ => string_field(fm, "argument-hint"),
    }
}

/// Load every `*.md` command under `dir`, recursively, sorted by relative path.
pub fn load_commands(dir: &Path, scope: Scope) -> Parsed<Command> {
    let mut out = Parsed::new();
    if !dir.is_dir() {
        return out;
    }

    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let at = e.path().unwrap_or(dir).to_path_buf();
                out.skip(&at, e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some("md")
        {
            continue;
        }
        let Ok(rel) = path.strip_prefix(dir) else {
            continue;
        };
        let parsed = std::fs::read_to_string(path)
            .map_err(CcmError::from)
            .and_then(|raw| parse_command(path, rel, &raw, scope));
        match parsed {
            Ok(cmd) => out.items.push(cmd),
            Err(e) => out.skip(path, e),
        }
    }

    out.items.sort_by(|a, b| a.file.cmp(&b.file));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, body: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    #[test]
    fn top_level_command_has_no_namespace() {
        let raw = "---\ndescription: Run all backend and frontend tests\nargument-hint: [suite]\nallowed-tools: Bash(npm test:*), Read\n---\nRun `npm test`.";
        let cmd = parse_command(
            Path::new("/p/.claude/commands/test-all.md"),
            Path::new("test-all.md"),
            raw,
            Scope::Project,
        )
        .unwrap();
        assert_eq!(cmd.name, "test-all");
        assert_eq!(cmd.file, "test-all.md");
        assert!(cmd.namespace.is_none());
        assert_eq!(cmd.description, "Run all backend and frontend tests");
        assert_eq!(cmd.argument_hint.as_deref(), Some("[suite]"));
        assert_eq!(cmd.allowed_tools, vec!["Bash(npm test:*)", "Read"]);
    }

    #[test]
    fn description_falls_back_to_first_line() {
        let cmd = parse_command(
            Path::new("/x/review.md"),
            Path::new("review.md"),
            "\n# Review the current diff\n\nDetails.",
            Scope::User,
        )
        .unwrap();
        assert_eq!(cmd.description, "Review the current diff");
        assert!(cmd.frontmatter.is_empty());
    }

    #[test]
    fn load_commands_walks_nested_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("commands");
        write(&root.join("deploy.md"), "Deploy it");
        write(&root.join("git/commit.md"), "---\ndescription: Commit\n---\nbody");
        write(&root.join("git/flow/release.md"), "Release");
        write(&root.join("git/README.txt"), "not a command");

        let parsed = load_commands(&root, Scope::Project);
        assert!(parsed.warnings.is_empty());
        let names: Vec<_> = parsed.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["deploy", "git/commit", "git/flow/release"]);

        let release = &parsed.items[2];
        assert_eq!(release.namespace.as_deref(), Some("git/flow"));
        assert_eq!(release.file, "git/flow/release.md");
    }

    #[test]
    fn load_commands_isolates_bad_yaml() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("commands");
        write(&root.join("good.md"), "---\ndescription: fine\n---\n");
        write(&root.join("bad.md"), "---\ndescription: [unclosed\n---\n");

        let parsed = load_commands(&root, Scope::User);
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].name, "good");
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].file.ends_with("bad.md"));
    }

    #[test]
    fn load_commands_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let parsed = load_commands(&dir.path().join("missing"), Scope::Project);
        assert!(parsed.is_empty());
        assert!(parsed.warnings.is_empty());
    }
}
