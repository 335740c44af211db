use axum::extract::State;
use axum::Json;
use ccm_core::parsed::Parsed;
use ccm_core::user;
use serde::Serialize;
use serde_json::{json, Value};

use super::blocking;
use crate::error::AppError;
use crate::state::AppState;

async fn user_scan<T>(
    app: &AppState,
    key: &str,
    scan: fn(&std::path::Path) -> Parsed<T>,
) -> Result<Json<Value>, AppError>
where
    T: Serialize + Send + 'static,
{
    let home = app.home.clone();
    let parsed = blocking(move || scan(&home)).await?;
    let mut body = json!({ "success": true, "warnings": parsed.warnings });
    body[key] = json!(parsed.items);
    Ok(Json(body))
}

/// GET /api/user/agents
pub async fn user_agents(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    user_scan(&app, "agents", user::user_agents).await
}

/// GET /api/user/commands
pub async fn user_commands(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    user_scan(&app, "commands", user::user_commands).await
}

/// GET /api/user/hooks
pub async fn user_hooks(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    user_scan(&app, "hooks", user::user_hooks).await
}

/// GET /api/user/mcp
pub async fn user_mcp(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    user_scan(&app, "mcp", user::user_mcp).await
}
