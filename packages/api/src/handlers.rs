use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use vitrine_core::{ProductCreateInput, ProductUpdateInput};

pub async fn health_check(State(state): State<AppState>) -> ResponseJson<Value> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    ResponseJson(json!({
        "status": "healthy",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "vitrine",
        "products": state.live.store().len().await,
        "subscribers": state.live.subscriber_count(),
    }))
}

/// List all products
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products = state.live.store().get_all().await;
    info!("Retrieved {} products", products.len());
    ResponseJson(ApiResponse::success(products))
}

/// Get a specific product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let product = state
        .live
        .store()
        .get_by_id(id)
        .await
        .ok_or(ApiError::NotFound)?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

/// Create a product and push the new catalog to live clients
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductCreateInput>,
) -> ApiResult<impl IntoResponse> {
    let product = state.live.store().add_product(input).await?;
    state.live.broadcast_snapshot().await;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(product))))
}

/// Update a product and push the new catalog to live clients
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<ProductUpdateInput>,
) -> ApiResult<impl IntoResponse> {
    let product = state.live.store().update_product(id, input).await?;
    state.live.broadcast_snapshot().await;
    Ok(ResponseJson(ApiResponse::success(product)))
}

/// Delete a product and push the new catalog to live clients
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let product = state.live.store().delete_product(id).await?;
    state.live.broadcast_snapshot().await;
    Ok(ResponseJson(ApiResponse::success(product)))
}
