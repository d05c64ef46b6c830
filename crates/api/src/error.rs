//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every response body uses the stable
//! `{ "code", "message" }` envelope so API consumers can branch on `code`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::CreateOrderError;

/// Application-level error type for the order API.
#[derive(Debug, Error)]
pub enum AppError {
    /// The customer has already ordered this product.
    #[error("customer has already ordered this product")]
    DuplicateOrder,

    /// The email is unknown to the external user directory.
    #[error("email does not exist in external user system")]
    EmailNotFound,

    /// The external user directory is unavailable.
    #[error("external user directory error: {0}")]
    DirectoryUnavailable(String),

    /// Bad request from the client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A required query parameter is missing.
    #[error("required query parameter '{0}' is missing")]
    MissingParameter(&'static str),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

impl From<CreateOrderError> for AppError {
    fn from(err: CreateOrderError) -> Self {
        match err {
            CreateOrderError::Duplicate => Self::DuplicateOrder,
            CreateOrderError::EmailNotFound => Self::EmailNotFound,
            CreateOrderError::DirectoryUnavailable(detail) => Self::DirectoryUnavailable(detail),
            CreateOrderError::Repository(e) => Self::Database(e),
        }
    }
}

/// Stable wire representation of an error.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; client errors are expected traffic
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::DuplicateOrder => StatusCode::CONFLICT,
            Self::EmailNotFound => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DirectoryUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) | Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let code = match &self {
            Self::DuplicateOrder => "DUPLICATE_ORDER",
            Self::EmailNotFound => "EMAIL_NOT_FOUND",
            Self::DirectoryUnavailable(_) => "EXTERNAL_SERVICE_ERROR",
            Self::BadRequest(_) | Self::MissingParameter(_) => "BAD_REQUEST",
            Self::Database(_) => "INTERNAL_ERROR",
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::DuplicateOrder => "Customer has already ordered this product".to_owned(),
            Self::EmailNotFound => "Email does not exist in external user system".to_owned(),
            Self::DirectoryUnavailable(detail) => detail.clone(),
            Self::BadRequest(detail) => format!("Invalid request: {detail}"),
            Self::MissingParameter(name) => {
                format!("Required query parameter '{name}' is missing")
            }
            Self::Database(_) => "Unexpected error".to_owned(),
        };

        (status, Json(ErrorResponse { code, message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::DuplicateOrder), StatusCode::CONFLICT);
        assert_eq!(
            get_status(AppError::EmailNotFound),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::DirectoryUnavailable("down".to_owned())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::BadRequest("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::MissingParameter("email")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Duplicate)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_workflow_outcomes_map_onto_app_errors() {
        assert!(matches!(
            AppError::from(CreateOrderError::Duplicate),
            AppError::DuplicateOrder
        ));
        assert!(matches!(
            AppError::from(CreateOrderError::EmailNotFound),
            AppError::EmailNotFound
        ));
        assert!(matches!(
            AppError::from(CreateOrderError::DirectoryUnavailable("x".to_owned())),
            AppError::DirectoryUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(CreateOrderError::Repository(RepositoryError::Duplicate)),
            AppError::Database(_)
        ));
    }

    #[tokio::test]
    async fn test_internal_errors_do_not_leak_details() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "secret table detail".to_owned(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "Unexpected error");
    }

    #[tokio::test]
    async fn test_error_envelope_carries_stable_codes() {
        let response = AppError::MissingParameter("email").into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(
            body["message"],
            "Required query parameter 'email' is missing"
        );
    }
}
