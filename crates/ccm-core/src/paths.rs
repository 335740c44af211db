use crate::error::{CcmError, Result};
use std::path::{Component, Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const CLAUDE_JSON: &str = ".claude.json";
pub const AGENTS_DIR: &str = "agents";
pub const COMMANDS_DIR: &str = "commands";
pub const SETTINGS_FILE: &str = "settings.json";
pub const LOCAL_SETTINGS_FILE: &str = "settings.local.json";
pub const MCP_JSON: &str = ".mcp.json";

// ---------------------------------------------------------------------------
// Home directory
// ---------------------------------------------------------------------------

/// The current user's home directory. `$HOME` wins when set.
pub fn home_dir() -> Result<PathBuf> {
    home::home_dir()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(CcmError::HomeNotFound)
}

/// Expand a leading `~` against `home`. Other paths are returned unchanged.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Render `path` relative to `home` as `~/...` when it lives underneath it.
pub fn display_path(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", to_slash(rest)),
        Err(_) => path.display().to_string(),
    }
}

/// Join `rel` with `/` separators regardless of platform.
pub fn to_slash(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ---------------------------------------------------------------------------
// Project ids
// ---------------------------------------------------------------------------

/// Derive a URL-safe project id from its path.
///
/// `/home/user/projects/MyApp` becomes `homeuserprojectsmyapp`: one leading
/// slash is dropped, then every separator, drive colon and whitespace
/// character is removed and the remainder lowercased.
pub fn project_id(path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Safety helpers
// ---------------------------------------------------------------------------

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Join `segment` onto `base`, refusing results that escape `base`.
pub fn safe_join(base: &Path, segment: &str) -> Result<PathBuf> {
    let base = normalize(base);
    let joined = normalize(&base.join(segment));
    if !joined.starts_with(&base) {
        return Err(CcmError::InvalidPath(segment.to_string()));
    }
    Ok(joined)
}

pub fn is_valid_directory(path: &Path) -> bool {
    path.is_dir()
}

// ---------------------------------------------------------------------------
// Location helpers
// ---------------------------------------------------------------------------

pub fn claude_json_path(home: &Path) -> PathBuf {
    home.join(CLAUDE_JSON)
}

/// `~/.claude` for the user scope, `<project>/.claude` for a project.
pub fn claude_dir(base: &Path) -> PathBuf {
    base.join(CLAUDE_DIR)
}

pub fn agents_dir(base: &Path) -> PathBuf {
    claude_dir(base).join(AGENTS_DIR)
}

pub fn commands_dir(base: &Path) -> PathBuf {
    claude_dir(base).join(COMMANDS_DIR)
}

pub fn settings_path(base: &Path) -> PathBuf {
    claude_dir(base).join(SETTINGS_FILE)
}

pub fn local_settings_path(base: &Path) -> PathBuf {
    claude_dir(base).join(LOCAL_SETTINGS_FILE)
}

pub fn mcp_json_path(project: &Path) -> PathBuf {
    project.join(MCP_JSON)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
