// ABOUTME: HTTP API layer for Vitrine providing REST, WebSocket and SSE endpoints
// ABOUTME: Every accepted catalog mutation is followed by a snapshot broadcast to live clients

use axum::{routing::get, Router};
use std::sync::Arc;
use vitrine_catalog::CatalogStore;

pub mod connections;
pub mod handlers;
pub mod live;
pub mod response;
pub mod sse;
pub mod ws;

pub use connections::{LiveConnectionTracker, DEFAULT_MAX_LIVE_CONNECTIONS_PER_IP};
pub use live::{AddProductStatus, CatalogSnapshot, ClientMessage, LiveSync, ServerEvent};
pub use response::{ApiError, ApiResponse};

/// Shared state for every route
#[derive(Clone)]
pub struct AppState {
    pub live: LiveSync,
    pub connections: LiveConnectionTracker,
}

impl AppState {
    pub fn new(store: Arc<CatalogStore>, max_live_connections_per_ip: usize) -> Self {
        Self {
            live: LiveSync::new(store),
            connections: LiveConnectionTracker::new(max_live_connections_per_ip),
        }
    }
}

/// Creates the products API router (nested under /api/products)
pub fn create_products_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/stream", get(sse::catalog_stream))
        .route(
            "/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

/// Creates the full application router.
///
/// The live endpoints read the client address, so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/health", get(handlers::health_check))
        .nest("/api/products", create_products_router())
        .with_state(state)
}
