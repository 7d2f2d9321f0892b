use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to load model artifacts: {0}")]
    ArtifactLoad(String),

    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    #[error("Unknown education category: '{0}'")]
    UnknownEducation(String),

    #[error("Feature order mismatch: {0}")]
    FeatureSchemaMismatch(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Only {0} requests are allowed")]
    MethodNotAllowed(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ArtifactLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownEducation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::FeatureSchemaMismatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ArtifactLoad(_) => "ARTIFACT_LOAD_ERROR",
            AppError::MalformedRequest(_) => "MALFORMED_REQUEST",
            AppError::UnknownEducation(_) => "UNKNOWN_EDUCATION",
            AppError::FeatureSchemaMismatch(_) => "FEATURE_SCHEMA_MISMATCH",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::ArtifactLoad(msg) | AppError::FeatureSchemaMismatch(msg) => {
                tracing::error!("Prediction pipeline error: {msg}");
                self.to_string()
            }
            _ => self.to_string(),
        };

        // Flat body: clients of the prediction endpoint read `error` as a plain string.
        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        (self.status(), body).into_response()
    }
}

/// Parses a JSON request body whatever its `Content-Type` header says.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::MalformedRequest(e.to_string()))
}
