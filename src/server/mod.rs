//! HTTP server initialization and routing

mod health;
mod shutdown;

pub use health::health_check;
pub use shutdown::shutdown_signal;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::shared::state::AppState;

/// Assemble the full application router over the shared state.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let max_body = app_state.config.uploads.max_bytes;
    Router::new()
        .merge(crate::tasks::configure_task_routes())
        .merge(crate::uploads::configure())
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(app_state: Arc<AppState>) -> std::io::Result<()> {
    let host: std::net::IpAddr = app_state
        .config
        .server
        .host
        .parse()
        .unwrap_or_else(|_| [0, 0, 0, 0].into());
    let addr = SocketAddr::from((host, app_state.config.server.port));
    let app = build_router(app_state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(
                "Failed to bind to {}: {} - is another instance running?",
                addr, e
            );
            return Err(e);
        }
    };
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}
