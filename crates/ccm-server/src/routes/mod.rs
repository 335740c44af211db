pub mod agents;
pub mod events;
pub mod health;
pub mod projects;
pub mod user;

use crate::error::AppError;

/// Any `/api/*` path without a route.
pub async fn api_not_found() -> AppError {
    AppError::not_found("API endpoint not found")
}

/// Await a `spawn_blocking` handle, turning a panicked task into a 500.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))
}
