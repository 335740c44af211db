//! HTTP API and embedded dashboard for browsing Claude Code configuration.

pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{any, get, post, put};
use axum::Router;
use std::path::PathBuf;
use axum::http::{header, request::Parts, HeaderValue};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use routes::health::SERVICE_NAME;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(home: PathBuf) -> Router {
    router(state::AppState::new(home))
}

/// Build the router around an existing state.
pub fn router(app_state: state::AppState) -> Router {
    // Only the dashboard itself may call the API from a browser; the write
    // routes touch files under the user's home.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(is_dashboard_origin))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/events", get(routes::events::sse_events))
        // Projects
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects/scan", post(routes::projects::scan_projects))
        .route("/api/projects/{id}", get(routes::projects::get_project))
        .route(
            "/api/projects/{id}/agents",
            get(routes::projects::project_agents),
        )
        .route(
            "/api/projects/{id}/agents/{agent_id}",
            put(routes::agents::put_project_agent),
        )
        .route(
            "/api/projects/{id}/commands",
            get(routes::projects::project_commands),
        )
        .route(
            "/api/projects/{id}/hooks",
            get(routes::projects::project_hooks),
        )
        .route("/api/projects/{id}/mcp", get(routes::projects::project_mcp))
        // User scope
        .route("/api/user/agents", get(routes::user::user_agents))
        .route(
            "/api/user/agents/{agent_id}",
            put(routes::agents::put_user_agent),
        )
        .route("/api/user/commands", get(routes::user::user_commands))
        .route("/api/user/hooks", get(routes::user::user_hooks))
        .route("/api/user/mcp", get(routes::user::user_mcp))
        .route("/api", any(routes::api_not_found))
        .route("/api/{*rest}", any(routes::api_not_found))
        .fallback(embed::static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// True when `origin` is the loopback address this request was sent to.
fn is_dashboard_origin(origin: &HeaderValue, parts: &Parts) -> bool {
    let Some(host) = parts.headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return false;
    };
    let hostname = host.rsplit_once(':').map_or(host, |(name, _)| name);
    if hostname != "localhost" && hostname != "127.0.0.1" {
        return false;
    }
    origin.to_str().is_ok_and(|o| o == format!("http://{host}"))
}

/// Start the dashboard server on a pre-bound listener.
///
/// The caller binds so it can pick the port (and report it) before serving.
/// Returns when `shutdown` resolves.
pub async fn serve_on(
    home: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(home);
    let url = format!("http://localhost:{actual_port}");

    tracing::info!("Claude Code Manager listening on {url}");

    if open_browser {
        self::open_browser(&url);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

/// Open `url` in the default browser. Failure is logged, never fatal.
pub fn open_browser(url: &str) -> bool {
    open_with(url, |u| open::that(u))
}

fn open_with(url: &str, opener: impl FnOnce(&str) -> std::io::Result<()>) -> bool {
    match opener(url) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, url, "could not open browser");
            false
        }
    }
}
