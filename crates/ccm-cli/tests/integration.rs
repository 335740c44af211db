#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(path: &Path, body: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn manager(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("claude-manager").unwrap();
    cmd.env("CLAUDE_MANAGER_HOME", home.path())
        .env_remove("PORT")
        .env_remove("RUST_LOG");
    cmd
}

/// Home with a registry listing one project (`shop`) and one vanished path.
fn setup() -> (TempDir, PathBuf) {
    let home = TempDir::new().unwrap();
    let project = home.path().join("work/shop");
    write(
        &project.join(".claude/agents/reviewer.md"),
        "---\nname: reviewer\ndescription: Reviews code\nmodel: opus\ntools: [Read, Grep]\n---\nBe thorough.",
    );
    write(&project.join(".claude/commands/deploy.md"), "# Deploy to staging\n");
    write(
        &project.join(".mcp.json"),
        r#"{ "mcpServers": { "db": { "command": "pg-mcp", "args": ["--ro"] }, "old": { "command": "x", "enabled": false } } }"#,
    );
    write(
        &home.path().join(".claude.json"),
        &format!(
            r#"{{ "projects": {{ "{}": {{}}, "/gone/away": {{}} }} }}"#,
            project.display()
        ),
    );
    write(
        &home.path().join(".claude/settings.json"),
        r#"{ "hooks": { "Stop": [ { "hooks": [ { "type": "command", "command": "say done" } ] } ] } }"#,
    );
    write(&home.path().join(".claude/agents/bad.md"), "---\nname: [\n---\n");
    (home, project)
}

// ---------------------------------------------------------------------------
// projects
// ---------------------------------------------------------------------------

#[test]
fn projects_table_lists_registry() {
    let (home, _) = setup();
    manager(&home)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("shop"))
        .stdout(predicate::str::contains("/gone/away (missing)"));
}

#[test]
fn projects_json_includes_stats() {
    let (home, _) = setup();
    let out = manager(&home)
        .args(["projects", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let projects = v["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["name"], "shop");
    assert_eq!(projects[0]["stats"]["agents"], 1);
    assert_eq!(projects[0]["stats"]["commands"], 1);
    assert_eq!(projects[0]["stats"]["mcp"], 2);
    assert_eq!(projects[1]["exists"], false);
}

#[test]
fn projects_with_empty_home() {
    let home = TempDir::new().unwrap();
    manager(&home)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found"));
}

// ---------------------------------------------------------------------------
// listings
// ---------------------------------------------------------------------------

#[test]
fn agents_for_project_by_name() {
    let (home, _) = setup();
    manager(&home)
        .args(["agents", "--project", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer"))
        .stdout(predicate::str::contains("Read, Grep"));
}

#[test]
fn user_agents_warn_on_stderr() {
    let (home, _) = setup();
    manager(&home)
        .arg("agents")
        .assert()
        .success()
        .stdout(predicate::str::contains("No agents found."))
        .stderr(predicate::str::contains("warning: skipped"))
        .stderr(predicate::str::contains("bad.md"));
}

#[test]
fn user_agents_json_has_items_and_warnings() {
    let (home, _) = setup();
    let out = manager(&home)
        .args(["agents", "-j"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["items"], serde_json::json!([]));
    assert_eq!(v["warnings"][0]["skipped"], true);
}

#[test]
fn commands_show_slash_names() {
    let (home, project) = setup();
    manager(&home)
        .args(["commands", "--project"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("/deploy"))
        .stdout(predicate::str::contains("Deploy to staging"));
}

#[test]
fn user_hooks_grouped_by_event() {
    let (home, _) = setup();
    manager(&home)
        .arg("hooks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stop"))
        .stdout(predicate::str::contains("say done"))
        .stdout(predicate::str::contains("~/.claude/settings.json"));
}

#[test]
fn mcp_lists_enabled_before_disabled() {
    let (home, _) = setup();
    let out = manager(&home)
        .args(["mcp", "-p", "shop"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    let db = text.find("pg-mcp --ro").unwrap();
    let old = text.find("disabled").unwrap();
    assert!(db < old);
}

#[test]
fn unknown_project_fails() {
    let (home, _) = setup();
    manager(&home)
        .args(["agents", "--project", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: Project not found: nope"));
}

#[test]
fn missing_project_directory_fails() {
    let (home, _) = setup();
    manager(&home)
        .args(["commands", "--project", "/gone/away"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Project directory does not exist: /gone/away",
        ));
}

#[test]
fn serve_help_mentions_port() {
    let home = TempDir::new().unwrap();
    manager(&home)
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--no-open"));
}

#[test]
fn include_user_appends_user_hooks_to_project() {
    let (home, _) = setup();
    manager(&home)
        .args(["hooks", "-p", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No hooks found."));
    manager(&home)
        .args(["hooks", "-p", "shop", "--include-user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stop"))
        .stdout(predicate::str::contains("say done"));
}

#[test]
fn include_user_json_lists_project_agents_first() {
    let (home, _) = setup();
    write(
        &home.path().join(".claude/agents/helper.md"),
        "---\nname: helper\ndescription: Helps\n---\nHelp.",
    );
    let out = manager(&home)
        .args(["agents", "-p", "shop", "--include-user", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let ids: Vec<&str> = v["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["reviewer", "helper"]);
    assert_eq!(v["warnings"][0]["skipped"], true);
}

#[test]
fn include_user_requires_project() {
    let (home, _) = setup();
    manager(&home)
        .args(["agents", "--include-user"])
        .assert()
        .failure();
}
