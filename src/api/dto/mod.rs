//! Request and response shapes for the HTTP surface.

mod auth;
mod category;
mod error;
mod product;
mod query;
mod response;
mod user;

pub use auth::{ForgotPasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest};
pub use category::{
    CategoryResponse, CategorySummaryResponse, CategoryViewResponse, CreateCategoryRequest,
    UpdateCategoryRequest,
};
pub use error::ErrorResponse;
pub use product::{
    CreateProductRequest, ProductResponse, ProductSummaryResponse, ProductViewResponse,
    UpdateProductRequest,
};
pub use query::ListQuery;
pub use response::{ApiResponse, MessageResponse};
pub use user::{
    ChangePasswordRequest, CreateUserRequest, UpdateProfileRequest, UserResponse,
    UserSummaryResponse,
};

use mongodb::bson::{DateTime, oid::ObjectId};

use crate::error::{AppError, AppResult};

/// Formats a store timestamp for response bodies.
pub fn format_datetime(datetime: DateTime) -> String {
    datetime.try_to_rfc3339_string().unwrap_or_default()
}

/// Parses a hex-encoded document id, failing with `BadRequest` naming the
/// offending parameter.
pub fn parse_object_id(value: &str, name: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| AppError::bad_request(format!("Invalid {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_valid() {
        assert!(parse_object_id("652f1a2b3c4d5e6f70818283", "id").is_ok());
    }

    #[test]
    fn test_parse_object_id_invalid() {
        let err = parse_object_id("nope", "id").unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Invalid id");
    }
}
