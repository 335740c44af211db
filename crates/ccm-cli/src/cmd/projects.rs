use crate::output::{print_json, print_table};
use anyhow::Result;
use ccm_core::project::{discover_projects, project_stats};
use serde_json::json;
use std::path::Path;

pub fn run(home: &Path, json: bool) -> Result<()> {
    let discovery = discover_projects(home);
    if let Some(err) = &discovery.error {
        eprintln!("warning: {err}");
    }

    let projects: Vec<_> = discovery
        .projects
        .iter()
        .map(|p| (p, project_stats(p)))
        .collect();

    if json {
        let list: Vec<_> = projects
            .iter()
            .map(|(p, stats)| {
                json!({
                    "id": p.id,
                    "name": p.name,
                    "path": p.path,
                    "exists": p.exists,
                    "stats": stats,
                })
            })
            .collect();
        return print_json(&json!({ "projects": list, "error": discovery.error }));
    }

    if projects.is_empty() {
        println!("No projects found in {}.", home.join(".claude.json").display());
        return Ok(());
    }

    let rows = projects
        .iter()
        .map(|(p, s)| {
            let path = if p.exists {
                p.path.display().to_string()
            } else {
                format!("{} (missing)", p.path.display())
            };
            vec![
                p.id.clone(),
                p.name.clone(),
                s.agents.to_string(),
                s.commands.to_string(),
                s.hooks.to_string(),
                s.mcp.to_string(),
                path,
            ]
        })
        .collect();
    print_table(
        &["ID", "NAME", "AGENTS", "COMMANDS", "HOOKS", "MCP", "PATH"],
        rows,
    );
    Ok(())
}
