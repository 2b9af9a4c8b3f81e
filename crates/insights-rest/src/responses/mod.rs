//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use insights_core::{ErrorResponse, InsightsError};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Creates an error response.
    pub fn error(error: ErrorResponse) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Renders an error envelope with the given status.
pub fn error_response(status: StatusCode, error: ErrorResponse) -> Response {
    (status, Json(ApiResponse::error(error))).into_response()
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub InsightsError);

impl From<InsightsError> for AppError {
    fn from(err: InsightsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        error_response(status, ErrorResponse::from_error(&self.0))
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
