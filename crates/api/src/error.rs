//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use orchestrator::OrchestratorError;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request carried no caller identity.
    #[error("missing x-user-id header")]
    Unauthorized,

    /// Malformed request payload.
    #[error("{0}")]
    BadRequest(String),

    /// Turn processing failed.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// Direct store access failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Orchestrator(err) => match err {
                OrchestratorError::InsufficientCredits
                | OrchestratorError::InsufficientImageCredits { .. }
                | OrchestratorError::Validation(_)
                | OrchestratorError::NoUserMessage => StatusCode::BAD_REQUEST,
                OrchestratorError::ImageGeneration(_) | OrchestratorError::Media(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                OrchestratorError::Database(db) => database_status(db),
            },
            ApiError::Database(db) => database_status(db),
        }
    }
}

fn database_status(err: &DatabaseError) -> StatusCode {
    match err {
        DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
        DatabaseError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
