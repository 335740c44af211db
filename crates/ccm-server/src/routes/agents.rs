use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use ccm_core::writer::{self, AgentUpdate};
use ccm_core::{paths, Scope};
use serde_json::{json, Value};

use super::blocking;
use crate::error::AppError;
use crate::state::{AppState, Change};

/// Validate the id, write `<base>/.claude/agents/<agent_id>.md`, and notify
/// subscribers.
async fn save_agent(
    app: &AppState,
    base: std::path::PathBuf,
    agent_id: String,
    body: Result<Json<AgentUpdate>, JsonRejection>,
    scope: Scope,
) -> Result<Json<Value>, AppError> {
    let Json(update) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    writer::validate_agent_id(&agent_id)?;
    let path = paths::safe_join(&paths::agents_dir(&base), &format!("{agent_id}.md"))?;

    let agent = blocking(move || writer::write_agent(&path, &update, scope)).await??;
    tracing::info!(agent = %agent.id, scope = %scope, "agent saved");
    app.notify(Change::AgentSaved);

    Ok(Json(json!({ "success": true, "agent": agent })))
}

/// PUT /api/projects/{id}/agents/{agent_id}
pub async fn put_project_agent(
    State(app): State<AppState>,
    Path((id, agent_id)): Path<(String, String)>,
    body: Result<Json<AgentUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let project = app.project(&id).await?;
    save_agent(&app, project.path, agent_id, body, Scope::Project).await
}

/// PUT /api/user/agents/{agent_id}
pub async fn put_user_agent(
    State(app): State<AppState>,
    Path(agent_id): Path<String>,
    body: Result<Json<AgentUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let home = app.home.clone();
    save_agent(&app, home, agent_id, body, Scope::User).await
}
