use serde::Serialize;
use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Variants are grouped by caller-visible intent rather than by origin, so the
/// HTTP layer can map each one to a status code without inspecting sources.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource lookup that matched nothing
    #[error("{message}")]
    NotFound { message: String },

    /// Unique-field collision or a business rule that rejects a repeated value
    #[error("{message}")]
    Conflict { message: String },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple field validation failures collected from a request payload
    #[error("Validation failed for {} field(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Unauthorized access error with authentication message
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Forbidden access error with authorization message
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Document store operation error with operation context
    #[error("Document store operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// A single field that failed request validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden {
            message: message.into(),
        }
    }

    pub fn database(operation: impl Into<String>, source: mongodb::error::Error) -> Self {
        AppError::Database {
            operation: operation.into(),
            source,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(error: mongodb::error::Error) -> Self {
        AppError::Database {
            operation: "document store operation".to_string(),
            source: error,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let errors = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| ValidationFieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {field}")),
                })
            })
            .collect();

        AppError::ValidationErrors { errors }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = AppError::not_found("This category record could not be found");
        assert_eq!(err.to_string(), "This category record could not be found");
    }

    #[test]
    fn test_conflict_display() {
        let err = AppError::conflict("User already exists.");
        assert_eq!(err.to_string(), "User already exists.");
    }

    #[test]
    fn test_validation_errors_from_validator() {
        use validator::Validate;

        #[derive(Validate)]
        struct Payload {
            #[validate(email(message = "Invalid email format"))]
            email: String,
        }

        let payload = Payload {
            email: "not-an-email".to_string(),
        };
        let err: AppError = payload.validate().unwrap_err().into();
        match err {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].message, "Invalid email format");
            }
            other => panic!("expected ValidationErrors, got {other:?}"),
        }
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
