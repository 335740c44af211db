use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// A file that was skipped during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub file: String,
    pub error: String,
    pub skipped: bool,
}

/// Items parsed from one or more files plus a warning for every file or entry
/// that could not be used. A bad file never aborts the scan.
#[derive(Debug, Clone, Serialize)]
pub struct Parsed<T> {
    pub items: Vec<T>,
    pub warnings: Vec<ParseWarning>,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> Parsed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record a skipped file (or entry within a file) and log it.
    pub fn skip(&mut self, file: &Path, error: impl ToString) {
        let error = error.to_string();
        warn!(file = %file.display(), error = %error, "skipping configuration entry");
        self.warnings.push(ParseWarning {
            file: file.display().to_string(),
            error,
            skipped: true,
        });
    }

    /// Append another result, keeping `self`'s items first.
    pub fn extend(&mut self, other: Parsed<T>) {
        self.items.extend(other.items);
        self.warnings.extend(other.warnings);
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Parsed<U> {
        Parsed {
            items: self.items.into_iter().map(f).collect(),
            warnings: self.warnings,
        }
    }
}

/// Combine a project-scope result with a user-scope result, project first.
pub fn merge<T>(project: Parsed<T>, user: Parsed<T>) -> Parsed<T> {
    let mut out = project;
    out.extend(user);
    out
}
