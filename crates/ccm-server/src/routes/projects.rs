use axum::extract::{Path, State};
use axum::Json;
use ccm_core::parsed::Parsed;
use ccm_core::project::{self, Project, ProjectStats};
use serde::Serialize;
use serde_json::{json, Value};

use super::blocking;
use crate::error::AppError;
use crate::state::{AppState, Change};

/// A project as shown on the dashboard: registry data plus artifact counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub stats: ProjectStats,
}

async fn summarize(project: Project) -> Result<ProjectSummary, AppError> {
    blocking(move || {
        let stats = project::project_stats(&project);
        ProjectSummary { project, stats }
    })
    .await
}

/// GET /api/projects: every registered project with stats.
pub async fn list_projects(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    let discovery = app.discovery().await?;
    let summaries = futures::future::join_all(
        discovery.projects.iter().cloned().map(summarize),
    )
    .await
    .into_iter()
    .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(json!({
        "success": true,
        "projects": summaries,
        "error": discovery.error,
        "scannedAt": discovery.scanned_at,
    })))
}

/// POST /api/projects/scan: drop the cache and rediscover.
pub async fn scan_projects(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    let discovery = app.rescan().await?;
    tracing::info!(count = discovery.projects.len(), "rescanned projects");
    app.notify(Change::Rescan);
    Ok(Json(json!({
        "success": true,
        "projectCount": discovery.projects.len(),
        "error": discovery.error,
        "scannedAt": discovery.scanned_at,
    })))
}

/// GET /api/projects/{id}
pub async fn get_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let project = app.project(&id).await?;
    let summary = summarize(project).await?;
    Ok(Json(json!({ "success": true, "project": summary })))
}

/// Run one project-scope scan and shape the response as
/// `{ success, <key>, warnings, projectId, projectPath }`.
async fn project_scan<T>(
    app: &AppState,
    id: &str,
    key: &str,
    scan: fn(&std::path::Path) -> Parsed<T>,
) -> Result<Json<Value>, AppError>
where
    T: Serialize + Send + 'static,
{
    let project = app.project(id).await?;
    let path = project.path.clone();
    let parsed = blocking(move || scan(&path)).await?;

    let mut body = json!({
        "success": true,
        "warnings": parsed.warnings,
        "projectId": project.id,
        "projectPath": project.path,
    });
    body[key] = json!(parsed.items);
    Ok(Json(body))
}

/// GET /api/projects/{id}/agents
pub async fn project_agents(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    project_scan(&app, &id, "agents", project::project_agents).await
}

/// GET /api/projects/{id}/commands
pub async fn project_commands(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    project_scan(&app, &id, "commands", project::project_commands).await
}

/// GET /api/projects/{id}/hooks
pub async fn project_hooks(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    project_scan(&app, &id, "hooks", project::project_hooks).await
}

/// GET /api/projects/{id}/mcp
pub async fn project_mcp(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    project_scan(&app, &id, "mcp", project::project_mcp).await
}
