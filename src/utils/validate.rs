use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// JSON extractor that runs the payload's `Validate` rules after
/// deserialization. Malformed bodies map to `BadRequest`, failed rules to
/// `ValidationErrors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestPayload {
        #[validate(length(min = 3, max = 20, message = "Name must be between 3 and 20 characters"))]
        name: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload() {
        let request = json_request(r#"{"name":"widget","email":"test@example.com"}"#);

        let result = ValidatedJson::<TestPayload>::from_request(request, &()).await;

        assert!(result.is_ok());
        let ValidatedJson(payload) = result.unwrap();
        assert_eq!(payload.name, "widget");
    }

    #[tokio::test]
    async fn test_validation_error_short_name() {
        let request = json_request(r#"{"name":"ab","email":"test@example.com"}"#);

        let result = ValidatedJson::<TestPayload>::from_request(request, &()).await;

        assert!(result.is_err());
        match result.unwrap_err() {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "name");
                assert!(errors[0].message.contains("between 3 and 20 characters"));
            }
            other => panic!("Expected ValidationErrors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validation_error_multiple_fields() {
        let request = json_request(r#"{"name":"ab","email":"invalid-email"}"#);

        let result = ValidatedJson::<TestPayload>::from_request(request, &()).await;

        assert!(result.is_err());
        match result.unwrap_err() {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert!(fields.contains(&"name"));
                assert!(fields.contains(&"email"));
            }
            other => panic!("Expected ValidationErrors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let request = json_request(r#"{"name":"widget""#);

        let result = ValidatedJson::<TestPayload>::from_request(request, &()).await;

        assert!(result.is_err());
        match result.unwrap_err() {
            AppError::BadRequest { message } => assert!(!message.is_empty()),
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let request = json_request(r#"{"name":"widget"}"#);

        let result = ValidatedJson::<TestPayload>::from_request(request, &()).await;

        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }
}
