//! User-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::format_datetime;
use crate::models::{Role, User, UserSummary};
use crate::services::{ChangePasswordData, CreateUserData, UpdateProfileData};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Full Name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone_number: Option<String>,
    #[validate(url(message = "Profile Image must be a valid URI"))]
    pub profile_image: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

impl CreateUserRequest {
    pub fn into_data(self) -> CreateUserData {
        CreateUserData {
            full_name: self.full_name,
            email: self.email,
            password: self.password,
            role: self.role,
            phone_number: self.phone_number,
            profile_image: self.profile_image,
        }
    }
}

/// Request body for updating the authenticated user's profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    #[validate(url(message = "Profile Image must be a valid URI"))]
    pub profile_image: Option<String>,
}

impl UpdateProfileRequest {
    pub fn into_data(self) -> UpdateProfileData {
        UpdateProfileData {
            full_name: self.full_name,
            phone_number: self.phone_number,
            profile_image: self.profile_image,
        }
    }
}

/// Request body for a password change.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current Password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub confirm_password: String,
}

impl ChangePasswordRequest {
    pub fn into_data(self) -> ChangePasswordData {
        ChangePasswordData {
            current_password: self.current_password,
            password: self.password,
            confirm_password: self.confirm_password,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for user data. The password hash never appears here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            full_name: user.full_name,
            email: user.email,
            is_active: user.is_active,
            role: user.role,
            phone_number: user.phone_number,
            profile_image: user.profile_image,
            last_login: user.last_login.map(format_datetime),
            created_at: format_datetime(user.created_at),
            updated_at: format_datetime(user.updated_at),
        }
    }
}

/// Creator summary attached to expanded catalog entities.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.to_hex(),
            full_name: summary.full_name,
            email: summary.email,
            profile_image: summary.profile_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_has_no_password_field() {
        let user = User::new(
            "Jane Doe".to_string(),
            "jane@example.com".to_string(),
            "$argon2id$hash".to_string(),
            Role::Customer,
            None,
            None,
        );
        let response = UserResponse::from(user);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["role"], "customer");
    }

    #[test]
    fn test_change_password_requires_matching_confirmation() {
        let request = ChangePasswordRequest {
            current_password: "old-password".to_string(),
            password: "new-password".to_string(),
            confirm_password: "different".to_string(),
        };
        assert!(request.validate().is_err());

        let request = ChangePasswordRequest {
            current_password: "old-password".to_string(),
            password: "new-password".to_string(),
            confirm_password: "new-password".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_user_request_validation() {
        let request = CreateUserRequest {
            full_name: "Jane Doe".to_string(),
            email: "not-an-email".to_string(),
            phone_number: None,
            profile_image: None,
            password: "short".to_string(),
            role: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
