use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ml::ScoringError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Prediction(msg) => {
                tracing::error!(error = %msg, "Prediction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error making prediction: {msg}"))
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<ScoringError> for AppError {
    fn from(e: ScoringError) -> Self {
        match e {
            ScoringError::ModelsUnavailable => AppError::ServiceUnavailable(e.to_string()),
            ScoringError::EmptyBatch => AppError::BadRequest(e.to_string()),
            ScoringError::SchemaMismatch { .. } | ScoringError::Fault(_) => {
                AppError::Prediction(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_errors_map_to_status_codes() {
        let cases = [
            (ScoringError::ModelsUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (ScoringError::EmptyBatch, StatusCode::BAD_REQUEST),
            (
                ScoringError::SchemaMismatch {
                    missing: vec!["merchant_id".into()],
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ScoringError::Fault("scaled feature is not finite".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let resp = AppError::from(err).into_response();
            assert_eq!(resp.status(), expected);
        }
    }

    #[test]
    fn test_validation_maps_to_unprocessable() {
        let resp = AppError::Validation("salary: must be positive".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
