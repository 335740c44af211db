use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a configuration artifact was defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Committed project settings under `<project>/.claude` or `<project>/.mcp.json`.
    Project,
    /// `<project>/.claude/settings.local.json`, normally git-ignored.
    ProjectLocal,
    /// Everything under `~/.claude` plus `~/.claude.json`.
    User,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Project => "project",
            Scope::ProjectLocal => "project-local",
            Scope::User => "user",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
