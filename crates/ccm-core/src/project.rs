//! Project discovery from `~/.claude.json` and per-project aggregation.

use crate::agent::{load_agents, Agent};
use crate::command::{load_commands, Command};
use crate::hook::{self, load_hooks, Hook};
use crate::io;
use crate::mcp::{load_mcp_json, load_mcp_settings, McpServer};
use crate::parsed::Parsed;
use crate::paths;
use crate::scope::Scope;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    /// Whether the directory is still on disk.
    pub exists: bool,
    /// The project's entry in `~/.claude.json`, passed through untouched.
    pub config: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub agents: usize,
    pub commands: usize,
    pub hooks: usize,
    pub mcp: usize,
}

/// Result of reading the project registry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    /// Projects in registry order.
    pub projects: Vec<Project>,
    /// Why the registry could not be read, if it could not.
    pub error: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl Discovery {
    pub fn empty() -> Self {
        Self {
            projects: Vec::new(),
            error: None,
            scanned_at: Utc::now(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Look a project up by id, then by full path, then by directory name.
    pub fn find(&self, key: &str) -> Option<&Project> {
        self.get(key)
            .or_else(|| self.projects.iter().find(|p| p.path == Path::new(key)))
            .or_else(|| self.projects.iter().find(|p| p.name == key))
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Read `~/.claude.json` and build the project list.
///
/// A missing registry is not an error. An unreadable or malformed one yields no
/// projects and reports the problem in `error`.
pub fn discover_projects(home: &Path) -> Discovery {
    let registry = paths::claude_json_path(home);
    let root = match io::read_json(&registry) {
        Ok(Some(v)) => v,
        Ok(None) => {
            debug!(path = %registry.display(), "no project registry");
            return Discovery::empty();
        }
        Err(e) => {
            warn!(path = %registry.display(), error = %e, "failed to read project registry");
            return Discovery {
                error: Some(e.to_string()),
                ..Discovery::empty()
            };
        }
    };

    let Some(entries) = root.get("projects").and_then(Value::as_object) else {
        return Discovery::empty();
    };

    let mut seen = HashSet::new();
    let mut projects = Vec::with_capacity(entries.len());
    for (raw_path, config) in entries {
        let path = paths::expand_home(raw_path, home);
        let base_id = paths::project_id(&path.to_string_lossy());
        let id = unique_id(&base_id, &mut seen);
        if id != base_id {
            warn!(path = %path.display(), id = %id, "project id collision, using suffixed id");
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        projects.push(Project {
            id,
            name,
            exists: paths::is_valid_directory(&path),
            path,
            config: config.clone(),
        });
    }

    debug!(count = projects.len(), "discovered projects");
    Discovery {
        projects,
        error: None,
        scanned_at: Utc::now(),
    }
}

fn unique_id(base: &str, seen: &mut HashSet<String>) -> String {
    if seen.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Project-scope artifacts
// ---------------------------------------------------------------------------

pub fn project_agents(project: &Path) -> Parsed<Agent> {
    load_agents(&paths::agents_dir(project), Scope::Project)
}

pub fn project_commands(project: &Path) -> Parsed<Command> {
    load_commands(&paths::commands_dir(project), Scope::Project)
}

/// Hooks from `settings.json` followed by `settings.local.json`.
pub fn project_hooks(project: &Path) -> Parsed<Hook> {
    let mut out = load_hooks(
        &paths::settings_path(project),
        Scope::Project,
        paths::SETTINGS_FILE,
    );
    out.extend(load_hooks(
        &paths::local_settings_path(project),
        Scope::ProjectLocal,
        paths::LOCAL_SETTINGS_FILE,
    ));
    out
}

/// Servers from `.mcp.json`, then both settings files.
pub fn project_mcp(project: &Path) -> Parsed<McpServer> {
    let mut out = load_mcp_json(&paths::mcp_json_path(project), Scope::Project, paths::MCP_JSON);
    out.extend(load_mcp_settings(
        &paths::settings_path(project),
        Scope::Project,
        paths::SETTINGS_FILE,
    ));
    out.extend(load_mcp_settings(
        &paths::local_settings_path(project),
        Scope::ProjectLocal,
        paths::LOCAL_SETTINGS_FILE,
    ));
    out
}

/// Count the artifacts a project defines. Missing projects count as empty.
pub fn project_stats(project: &Project) -> ProjectStats {
    if !project.exists {
        return ProjectStats::default();
    }
    let path = project.path.as_path();
    ProjectStats {
        agents: project_agents(path).len(),
        commands: project_commands(path).len(),
        hooks: hook::action_count(&project_hooks(path).items),
        mcp: project_mcp(path).len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(path: &Path, body: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    fn registry(home: &Path, projects: Value) {
        write(
            &home.join(".claude.json"),
            &json!({ "numStartups": 3, "projects": projects }).to_string(),
        );
    }

    #[test]
    fn missing_registry_is_empty_without_error() {
        let home = TempDir::new().unwrap();
        let d = discover_projects(home.path());
        assert!(d.projects.is_empty());
        assert!(d.error.is_none());
    }

    #[test]
    fn malformed_registry_reports_error() {
        let home = TempDir::new().unwrap();
        write(&home.path().join(".claude.json"), "{ not json");
        let d = discover_projects(home.path());
        assert!(d.projects.is_empty());
        assert!(d.error.unwrap().contains("Invalid JSON"));
    }

    #[test]
    fn discovers_projects_in_registry_order() {
        let home = TempDir::new().unwrap();
        let live = home.path().join("code/Live App");
        std::fs::create_dir_all(&live).unwrap();
        registry(
            home.path(),
            json!({
                live.to_string_lossy(): { "allowedTools": [] },
                "/definitely/not/here": {},
                "~/code/Live App": {}
            }),
        );

        let d = discover_projects(home.path());
        assert!(d.error.is_none());
        assert_eq!(d.projects.len(), 3);

        let first = &d.projects[0];
        assert_eq!(first.name, "Live App");
        assert!(first.exists);
        assert_eq!(first.id, paths::project_id(&live.to_string_lossy()));
        assert!(first.config.get("allowedTools").is_some());

        let gone = &d.projects[1];
        assert_eq!(gone.id, "definitelynothere");
        assert!(!gone.exists);

        // The `~` entry expands to the same directory and collides.
        let dup = &d.projects[2];
        assert_eq!(dup.path, live);
        assert_eq!(dup.id, format!("{}-2", first.id));
    }

    #[test]
    fn find_matches_id_path_and_name() {
        let home = TempDir::new().unwrap();
        registry(home.path(), json!({ "/srv/web/shop": {} }));
        let d = discover_projects(home.path());
        assert!(d.find("srvwebshop").is_some());
        assert!(d.find("/srv/web/shop").is_some());
        assert!(d.find("shop").is_some());
        assert!(d.find("nope").is_none());
    }

    #[test]
    fn project_scans_and_stats() {
        let dir = TempDir::new().unwrap();
        let p = dir.path();
        write(&p.join(".claude/agents/reviewer.md"), "---\nname: reviewer\n---\nReview.");
        write(&p.join(".claude/agents/broken.md"), "---\nname: [\n---\n");
        write(&p.join(".claude/commands/ship.md"), "Ship it");
        write(&p.join(".claude/commands/git/commit.md"), "Commit");
        write(
            &p.join(".claude/settings.json"),
            &json!({
                "hooks": { "Stop": [ { "hooks": [ { "command": "a" }, { "command": "b" } ] } ] },
                "mcpServers": { "shared": { "command": "x" } }
            })
            .to_string(),
        );
        write(
            &p.join(".claude/settings.local.json"),
            &json!({ "hooks": { "PreToolUse": [ { "matcher": "Bash", "hooks": [ { "command": "c" } ] } ] } })
                .to_string(),
        );
        write(
            &p.join(".mcp.json"),
            &json!({ "mcpServers": { "github": { "command": "npx" } } }).to_string(),
        );

        let hooks = project_hooks(p);
        assert_eq!(hooks.items.len(), 2);
        assert_eq!(hooks.items[0].scope, Scope::Project);
        assert_eq!(hooks.items[1].scope, Scope::ProjectLocal);
        assert_eq!(hooks.items[1].source, "settings.local.json");

        let mcp = project_mcp(p);
        let names: Vec<_> = mcp.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["github", "shared"]);

        let project = Project {
            id: "x".into(),
            name: "x".into(),
            path: p.to_path_buf(),
            exists: true,
            config: Value::Null,
        };
        assert_eq!(
            project_stats(&project),
            ProjectStats {
                agents: 1,
                commands: 2,
                hooks: 3,
                mcp: 2
            }
        );
    }

    #[test]
    fn stats_for_missing_project_are_zero() {
        let project = Project {
            id: "gone".into(),
            name: "gone".into(),
            path: PathBuf::from("/definitely/not/here"),
            exists: false,
            config: Value::Null,
        };
        assert_eq!(project_stats(&project), ProjectStats::default());
    }
}
