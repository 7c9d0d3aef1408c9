pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use orbit_core::services::DeployManager;
use tower_http::trace::TraceLayer;

/// Build the axum Router with every route and the request trace layer.
/// Used by `serve()` and available for integration testing.
pub fn build_router(manager: Arc<DeployManager>) -> Router {
    let app_state = state::AppState::new(manager);

    Router::new()
        .route("/", get(routes::dashboard::index))
        // Deploy triggers
        .route(
            "/webhook",
            get(routes::webhook::webhook).post(routes::webhook::webhook),
        )
        .route("/build", post(routes::build::build_form))
        .route("/api/build", post(routes::build::build_api))
        // Read-only views
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/system", get(routes::system::get_system))
        // Config
        .route("/api/config", get(routes::config::get_config))
        .route("/api/config/global", put(routes::config::update_global))
        .route("/api/projects", post(routes::config::create_project))
        .route(
            "/api/projects/{name}",
            put(routes::config::update_project).delete(routes::config::delete_project),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Bind `0.0.0.0:<port>` and serve until Ctrl-C.
pub async fn serve(manager: Arc<DeployManager>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(manager, listener).await
}

/// Serve on a pre-bound listener.
///
/// Lets the caller read the actual port first when binding port 0.
pub async fn serve_on(
    manager: Arc<DeployManager>,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(manager);

    tracing::info!("orbit listening on http://localhost:{actual_port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
