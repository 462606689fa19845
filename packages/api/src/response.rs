// ABOUTME: Shared API response types and error handling
// ABOUTME: Provides consistent response format across all catalog endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use vitrine_catalog::CatalogError;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Errors returned by catalog handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Product not found")]
    NotFound,

    #[error("Too many live connections from this address")]
    TooManyConnections,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Catalog(CatalogError::DuplicateCode(_)) => StatusCode::CONFLICT,
            ApiError::Catalog(CatalogError::NotFound(_)) | ApiError::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::Catalog(CatalogError::IdsExhausted(_))
            | ApiError::Catalog(CatalogError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TooManyConnections => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Catalog(CatalogError::Persistence(e)) => {
                error!(error = %e, "Catalog storage error");
                "Catalog storage error".to_string()
            }
            other => other.to_string(),
        };

        (status, ResponseJson(ApiResponse::<()>::error(message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
