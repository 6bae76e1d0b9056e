use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::prediction::PredictError;

/// Everything a request can fail with. Always rendered as
/// `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Prediction(#[from] PredictError),

    /// Well-formed JSON whose values break a field rule
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Body missing, not JSON, or missing/mistyped fields
    #[error("Invalid request body: {}", .0.body_text())]
    Rejected(#[from] JsonRejection),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Prediction(PredictError::ModelUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Prediction(PredictError::Inference(_))     => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_)                              => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected(rejection)                        => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status  = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status_code = status.as_u16(), message = %message, "Request error");
        } else {
            tracing::debug!(status_code = status.as_u16(), message = %message, "Request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_maps_to_503() {
        let err = ApiError::from(PredictError::ModelUnavailable);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "Model or scaler not loaded. Please check server logs.");
    }

    #[test]
    fn test_inference_failure_maps_to_500() {
        let err = ApiError::from(PredictError::Inference("boom".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_422() {
        let err = ApiError::from(ValidationErrors::new());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
