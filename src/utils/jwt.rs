use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Role, User};

/// JWT claims carried by an access token.
///
/// The payload mirrors what the access-control gate needs without a database
/// round trip: identifier, email, active flag and role.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id, hex-encoded ObjectId)
    pub sub: String,
    /// User email
    pub email: String,
    /// Account active flag at issuance time
    pub is_active: bool,
    /// Account role
    pub role: Role,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user with the given validity in hours.
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user.id.to_hex(),
            email: user.email.clone(),
            is_active: user.is_active,
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Generates a signed access token for a user.
///
/// # Arguments
/// * `user` - The authenticated user the token is issued for
/// * `secret` - The secret key for signing the token
/// * `expiration_hours` - Token validity duration in hours
pub fn generate_access_token(user: &User, secret: &str, expiration_hours: i64) -> AppResult<String> {
    let claims = Claims::new(user, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Validates and decodes an access token.
///
/// Expired or malformed tokens map to `Unauthorized` so callers can forward
/// the condition without inspecting the source.
pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing";

    fn test_user() -> User {
        User::new(
            "Test User".to_string(),
            "test@example.com".to_string(),
            "$argon2id$hash".to_string(),
            Role::Admin,
            None,
            None,
        )
    }

    #[test]
    fn test_generate_token() {
        let token = generate_access_token(&test_user(), TEST_SECRET, 24);

        assert!(token.is_ok());
        let token_str = token.unwrap();
        assert!(!token_str.is_empty());
        assert!(token_str.contains('.'));
    }

    #[test]
    fn test_validate_token_success() {
        let user = test_user();
        let token = generate_access_token(&user, TEST_SECRET, 24).unwrap();

        let claims = validate_access_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, user.id.to_hex());
        assert_eq!(claims.email, "test@example.com");
        assert!(claims.is_active);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let token = generate_access_token(&test_user(), TEST_SECRET, 24).unwrap();

        let result = validate_access_token(&token, "wrong_secret");
        assert!(result.is_err());

        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("signature"));
        } else {
            panic!("Expected Unauthorized error");
        }
    }

    #[test]
    fn test_validate_token_invalid_format() {
        let result = validate_access_token("invalid.token.format", TEST_SECRET);
        assert!(result.is_err());

        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("Invalid token") || message.contains("validation"));
        } else {
            panic!("Expected Unauthorized error");
        }
    }

    #[test]
    fn test_expired_token() {
        // Negative hours to create an already expired token
        let token = generate_access_token(&test_user(), TEST_SECRET, -1).unwrap();

        let result = validate_access_token(&token, TEST_SECRET);
        assert!(result.is_err());

        if let Err(AppError::Unauthorized { message }) = result {
            assert!(message.contains("expired"));
        } else {
            panic!("Expected Unauthorized error for expired token");
        }
    }

    #[test]
    fn test_role_serialization_in_claims() {
        let claims = Claims::new(&test_user(), 1);
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"role\":\"admin\""));
    }
}
