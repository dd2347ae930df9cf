//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserResponse;
use crate::services::ResetPasswordData;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Forgot-password request payload
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Reset-password request payload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "OTP must be at least 6 characters"))]
    pub otp: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub confirm_password: String,
}

impl ResetPasswordRequest {
    pub fn into_data(self) -> ResetPasswordData {
        ResetPasswordData {
            email: self.email,
            otp: self.otp,
            password: self.password,
            confirm_password: self.confirm_password,
        }
    }
}

/// Login response with the sanitized user and access token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            email: "user@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = LoginRequest {
            email: "nope".to_string(),
            password: String::new(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_reset_password_confirmation_must_match() {
        let request = ResetPasswordRequest {
            email: "user@example.com".to_string(),
            otp: "123456".to_string(),
            password: "new-password".to_string(),
            confirm_password: "other-password".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
