use anyhow::Result;
use std::path::{Path, PathBuf};

/// Resolve the home directory to read Claude Code configuration from.
///
/// `--home` / `CLAUDE_MANAGER_HOME` (passed in as `explicit`) wins over the
/// user's real home directory.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(ccm_core::paths::expand_home(
            &p.to_string_lossy(),
            &ccm_core::paths::home_dir().unwrap_or_default(),
        ));
    }
    Ok(ccm_core::paths::home_dir()?)
}
