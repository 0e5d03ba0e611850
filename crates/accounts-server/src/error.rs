use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use accounts_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        // 404s carry no body.
        if status == StatusCode::NOT_FOUND {
            return status.into_response();
        }

        let error = if self.0.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, axum::Json(ErrorResponse { error })).into_response()
    }
}
