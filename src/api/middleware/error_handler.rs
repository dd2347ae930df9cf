//! Error handler for converting AppError to HTTP responses.
//!
//! The single terminal mapping from the error taxonomy to status codes and
//! user-safe messages. Internal diagnostics (driver errors, sources) are
//! logged, never serialized into the response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// User-safe stand-in for internal failures.
const INTERNAL_MESSAGE: &str = "It's not you, it's us. We're working on it. Please try again later.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::NotFound { message } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", message),
            ),
            AppError::Conflict { message } => (
                StatusCode::CONFLICT,
                ErrorResponse::new("CONFLICT", message),
            ),
            AppError::Validation { field, reason } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    "VALIDATION_ERROR",
                    &format!("Validation failed for {field}: {reason}"),
                ),
            ),
            AppError::ValidationErrors { errors } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", "Validation Error: Check your inputs.")
                    .with_details(json!({ "errors": errors })),
            ),
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message),
            ),
            AppError::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", message),
            ),
            AppError::Forbidden { message } => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("FORBIDDEN", message),
            ),
            AppError::Database { operation, source } => {
                tracing::error!(operation = %operation, error = %source, "Document store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", INTERNAL_MESSAGE),
                )
            }
            AppError::Configuration { key, source } => {
                tracing::error!(key = %key, error = %source, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("CONFIGURATION_ERROR", INTERNAL_MESSAGE),
                )
            }
            AppError::Internal { source } => {
                tracing::error!(error = %source, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", INTERNAL_MESSAGE),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Conflict { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            error_to_status_code(&AppError::not_found("missing")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_to_status_code(&AppError::conflict("duplicate")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_to_status_code(&AppError::bad_request("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status_code(&AppError::unauthorized("nope")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_to_status_code(&AppError::forbidden("denied")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_to_status_code(&AppError::Internal {
                source: anyhow::anyhow!("boom")
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_response() {
        let response = AppError::not_found("This category record could not be found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_is_sanitized() {
        // The response body must not leak the source message
        let response = AppError::Internal {
            source: anyhow::anyhow!("connection string with credentials"),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_errors_response() {
        let err: AppError = {
            use validator::Validate;

            #[derive(Validate)]
            struct Payload {
                #[validate(length(min = 8))]
                password: String,
            }

            Payload {
                password: "short".to_string(),
            }
            .validate()
            .unwrap_err()
            .into()
        };

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
