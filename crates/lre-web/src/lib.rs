//! LRE Web Server
//!
//! Axum-based server for the upload page, result tabs and JSON API.

pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;


use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use lre_core::AnalysisBackend;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Upload size accepted by the server. The page advertises 10MB.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(routes::api::status))
        .route("/result", get(routes::api::result))
        .route("/analyze", post(routes::api::analyze))
        .with_state(state.clone());

    // HTMX-driven HTML routes
    let page_routes = Router::new()
        .route("/", get(routes::page::index))
        .route("/results", get(routes::page::results))
        .route("/analyze", post(routes::page::analyze))
        .route("/clear", post(routes::page::clear))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(routes::api::health))
        .nest("/api", api_routes)
        .merge(page_routes)
        .route("/ws", get(websocket::ws_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(backend: Arc<dyn AnalysisBackend>, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(backend);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
