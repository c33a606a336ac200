// Server wiring for the recurrence APIs.

// Import axum routing utilities and Router
use axum::{
    routing::{get, post}, // HTTP method helpers
    Router,               // Main router type
};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use task_recurrence::routes_recurrence;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let api = Router::new()
        // recurrence
        .route("/recurrence/presets", get(routes_recurrence::get_presets))
        .route("/recurrence/validate", post(routes_recurrence::validate_config))
        .route("/recurrence/preview", post(routes_recurrence::preview));

    let app = Router::new().nest("/api", api);

    let addr: SocketAddr = "127.0.0.1:3000".parse().expect("valid bind address");
    tracing::info!(%addr, "recurrence service listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind failed");

    axum::serve(listener, app).await.expect("server error");
}
