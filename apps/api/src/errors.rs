use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The document carries no `%<BLOCK id="...">` regions to work on.
    #[error("No %<BLOCK id=\"...\"> ... %</BLOCK> blocks found in the document")]
    NoRegions,

    #[error("Not found: {0}")]
    NotFound(String),

    /// The text-generation service or every external compiler failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::NoRegions => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => ("PAYLOAD_TOO_LARGE", msg.clone()),
            AppError::NoRegions => ("NO_REGIONS", self.to_string()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                ("UPSTREAM_ERROR", msg.clone())
            }
            AppError::Render(msg) => {
                tracing::error!("Render error: {msg}");
                ("RENDER_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_regions_is_bad_request() {
        assert_eq!(AppError::NoRegions.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let err = AppError::Upstream("Empty model response.".to_string());
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_oversized_input_maps_to_413() {
        let err = AppError::PayloadTooLarge("document too long".to_string());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
