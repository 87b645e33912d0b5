mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::resolve::TargetResolver;
pub use state::AppState;

pub fn build_router(resolver: TargetResolver, circumpolar_latitude: f64) -> Router {
    let state = Arc::new(AppState {
        resolver,
        circumpolar_latitude,
    });

    Router::new()
        .route("/api/chart", get(handlers::chart))
        .route("/api/objects", get(handlers::object_list))
        .route("/api/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(
    host: &str,
    port: u16,
    resolver: TargetResolver,
    circumpolar_latitude: f64,
) -> std::io::Result<()> {
    let app = build_router(resolver, circumpolar_latitude);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("skytools server listening on http://{}", addr);
    eprintln!("  skytools server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
