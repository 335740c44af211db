//! User-scope artifacts under `~/.claude` and `~/.claude.json`.

use crate::agent::{load_agents, Agent};
use crate::command::{load_commands, Command};
use crate::hook::{load_hooks, Hook};
use crate::mcp::{load_mcp_settings, McpServer};
use crate::parsed::Parsed;
use crate::paths;
use crate::scope::Scope;
use std::path::Path;

pub fn user_agents(home: &Path) -> Parsed<Agent> {
    load_agents(&paths::agents_dir(home), Scope::User)
}

pub fn user_commands(home: &Path) -> Parsed<Command> {
    load_commands(&paths::commands_dir(home), Scope::User)
}

pub fn user_hooks(home: &Path) -> Parsed<Hook> {
    let settings = paths::settings_path(home);
    load_hooks(&settings, Scope::User, &paths::display_path(&settings, home))
}

/// Servers from `~/.claude/settings.json`, then the top level of `~/.claude.json`.
pub fn user_mcp(home: &Path) -> Parsed<McpServer> {
    let settings = paths::settings_path(home);
    let registry = paths::claude_json_path(home);
    let mut out = load_mcp_settings(
        &settings,
        Scope::User,
        &paths::display_path(&settings, home),
    );
    out.extend(load_mcp_settings(
        &registry,
        Scope::User,
        &paths::display_path(&registry, home),
    ));
    out
}
