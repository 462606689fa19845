use crate::config::Config;
use crate::error::{AppError, AppResult};
use axum::http::{HeaderValue, Method};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use vitrine_api::{create_router, AppState};
use vitrine_catalog::CatalogStore;

/// Builds the application router: API routes, live channel, CORS, request
/// tracing, and static files as the fallback when a directory is configured.
pub fn build_app(config: &Config, state: AppState) -> AppResult<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|_| AppError::InvalidCorsOrigin(config.cors_origin.clone()))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let mut app = create_router(state);

    if let Some(static_dir) = &config.static_dir {
        info!(dir = ?static_dir, "Serving static files");
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
}

/// Loads the catalog and serves until the process is stopped
pub async fn run_server(config: Config) -> AppResult<()> {
    let store = Arc::new(CatalogStore::load(&config.catalog_path).await);
    info!(
        path = ?config.catalog_path,
        products = store.len().await,
        "Catalog ready"
    );

    let state = AppState::new(store, config.max_live_connections_per_ip);
    let app = build_app(&config, state)?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;

    info!("Server listening on http://{}", addr);
    info!("Live catalog channel at ws://{}/ws", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(AppError::internal)?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
