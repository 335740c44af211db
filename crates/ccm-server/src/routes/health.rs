use axum::Json;
use serde_json::{json, Value};

/// Identifies this server to `claude-manager serve` when it checks for a
/// running instance.
pub const SERVICE_NAME: &str = "claude-code-manager";

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
    }))
}
