use crate::output::{print_json, print_table, print_warnings, truncate};
use anyhow::Result;
use ccm_core::hook::group_by_event;
use ccm_core::mcp::{split_by_enabled, McpServer};
use ccm_core::project::{self, discover_projects};
use ccm_core::parsed::merge;
use ccm_core::{user, CcmError, Parsed};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

const DESCRIPTION_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// Scope resolution
// ---------------------------------------------------------------------------

/// Scope flags shared by the listing subcommands.
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Project id, name or path (user scope when omitted)
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Also list user-scope entries after the project's own
    #[arg(long, requires = "project")]
    pub include_user: bool,
}

/// Which configuration a listing reads: a project directory or the user's home.
enum Target {
    Project(PathBuf),
    User(PathBuf),
}

fn target(home: &Path, project: Option<&str>) -> Result<Target> {
    let Some(key) = project else {
        return Ok(Target::User(home.to_path_buf()));
    };
    let discovery = discover_projects(home);
    let found = discovery
        .find(key)
        .ok_or_else(|| CcmError::ProjectNotFound(key.to_string()))?;
    if !found.path.is_dir() {
        return Err(CcmError::ProjectMissing(found.path.display().to_string()).into());
    }
    Ok(Target::Project(found.path.clone()))
}

fn load<T>(
    home: &Path,
    scope: &ScopeArgs,
    for_project: fn(&Path) -> Parsed<T>,
    for_user: fn(&Path) -> Parsed<T>,
) -> Result<Parsed<T>> {
    Ok(match target(home, scope.project.as_deref())? {
        Target::Project(path) if scope.include_user => merge(for_project(&path), for_user(home)),
        Target::Project(path) => for_project(&path),
        Target::User(home) => for_user(&home),
    })
}

/// Print `parsed` as JSON, or hand it to `table` when it has items.
fn emit<T: Serialize>(
    parsed: &Parsed<T>,
    json: bool,
    kind: &str,
    table: impl FnOnce(&[T]),
) -> Result<()> {
    if json {
        return print_json(parsed);
    }
    print_warnings(&parsed.warnings);
    if parsed.is_empty() {
        println!("No {kind} found.");
    } else {
        table(&parsed.items);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

pub fn agents(home: &Path, scope: &ScopeArgs, json: bool) -> Result<()> {
    let parsed = load(home, scope, project::project_agents, user::user_agents)?;
    emit(&parsed, json, "agents", |agents| {
        let rows = agents
            .iter()
            .map(|a| {
                vec![
                    a.id.clone(),
                    a.model.clone(),
                    a.tools.join(", "),
                    truncate(&a.description, DESCRIPTION_WIDTH),
                ]
            })
            .collect();
        print_table(&["ID", "MODEL", "TOOLS", "DESCRIPTION"], rows);
    })
}

pub fn commands(home: &Path, scope: &ScopeArgs, json: bool) -> Result<()> {
    let parsed = load(home, scope, project::project_commands, user::user_commands)?;
    emit(&parsed, json, "commands", |commands| {
        let rows = commands
            .iter()
            .map(|c| {
                vec![
                    format!("/{}", c.name),
                    c.argument_hint.clone().unwrap_or_default(),
                    truncate(&c.description, DESCRIPTION_WIDTH),
                ]
            })
            .collect();
        print_table(&["COMMAND", "ARGS", "DESCRIPTION"], rows);
    })
}

pub fn hooks(home: &Path, scope: &ScopeArgs, json: bool) -> Result<()> {
    let parsed = load(home, scope, project::project_hooks, user::user_hooks)?;
    emit(&parsed, json, "hooks", |hooks| {
        let mut rows = Vec::new();
        for (event, group) in group_by_event(hooks) {
            for hook in group {
                let commands: Vec<&str> = hook
                    .hooks
                    .iter()
                    .filter_map(|a| a.command.as_deref())
                    .collect();
                rows.push(vec![
                    event.clone(),
                    hook.matcher.clone(),
                    truncate(&commands.join("; "), DESCRIPTION_WIDTH),
                    hook.source.clone(),
                ]);
            }
        }
        print_table(&["EVENT", "MATCHER", "COMMANDS", "SOURCE"], rows);
    })
}

pub fn mcp(home: &Path, scope: &ScopeArgs, json: bool) -> Result<()> {
    let parsed = load(home, scope, project::project_mcp, user::user_mcp)?;
    emit(&parsed, json, "MCP servers", |servers| {
        let (enabled, disabled) = split_by_enabled(servers);
        let rows = enabled
            .iter()
            .map(|s| server_row(s, "enabled"))
            .chain(disabled.iter().map(|s| server_row(s, "disabled")))
            .collect();
        print_table(&["NAME", "TRANSPORT", "TARGET", "STATUS", "SOURCE"], rows);
    })
}

fn server_row(server: &McpServer, status: &str) -> Vec<String> {
    let target = match (&server.url, &server.command) {
        (Some(url), _) => url.clone(),
        (None, Some(cmd)) if server.args.is_empty() => cmd.clone(),
        (None, Some(cmd)) => format!("{cmd} {}", server.args.join(" ")),
        (None, None) => String::new(),
    };
    vec![
        server.name.clone(),
        server.transport.clone(),
        truncate(&target, DESCRIPTION_WIDTH),
        status.to_string(),
        server.source.clone(),
    ]
}
