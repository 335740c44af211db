use serde::Serialize;
use thiserror::Error;

/// A single rejected field in an agent update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<Vec<String>>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            valid_values: None,
        }
    }

    pub fn with_valid_values(mut self, values: &[&str]) -> Self {
        self.valid_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }
}

#[derive(Debug, Error)]
pub enum CcmError {
    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Project directory does not exist: {0}")]
    ProjectMissing(String),

    #[error("invalid agent id '{0}': must contain only letters, digits, hyphens, and underscores")]
    InvalidAgentId(String),

    #[error("Invalid path: directory traversal detected ({0})")]
    InvalidPath(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid YAML frontmatter: {0}")]
    Frontmatter(String),

    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CcmError>;
