//! Bearer-token authentication and role-based access control.
//!
//! `auth_middleware` validates the token and stores the decoded identity in
//! request extensions; `require_admin` layers an explicit role allow-list on
//! top of it.

use axum::{
    Extension,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use mongodb::bson::oid::ObjectId;

use crate::error::{AppError, AppResult};
use crate::models::Role;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Authenticated identity stored in request extensions after token
/// validation, extractable in handlers with `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub email: String,
    pub is_active: bool,
    pub role: Role,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> AppResult<Self> {
        let id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Please provide a valid token."))?;

        Ok(Self {
            id,
            email: claims.email,
            is_active: claims.is_active,
            role: claims.role,
        })
    }
}

/// Validates the bearer token and populates the authenticated identity.
///
/// A missing token is a `BadRequest`; an invalid or expired one, or a token
/// for an inactive account, is `Unauthorized`. Tokens are accepted with or
/// without the `Bearer ` prefix.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::bad_request("No token provided."))?;

    let token = authorization
        .strip_prefix("Bearer ")
        .unwrap_or(authorization);
    if token.is_empty() {
        return Err(AppError::bad_request("No token provided."));
    }

    let claims = validate_access_token(token, &state.settings.jwt.secret)
        .map_err(|_| AppError::unauthorized("Please provide a valid token."))?;

    if !claims.is_active {
        return Err(AppError::unauthorized("Account is currently not active"));
    }

    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Checks the identity's role against an explicit allow-list.
pub fn check_role(user: &AuthUser, allowed: &[Role]) -> AppResult<()> {
    if !allowed.contains(&user.role) {
        return Err(AppError::forbidden(format!(
            "Access denied for {}.",
            user.role
        )));
    }
    Ok(())
}

/// Restricts the wrapped routes to administrators. Must be layered after
/// (inside) `auth_middleware`.
pub async fn require_admin(
    Extension(user): Extension<AuthUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_role(&user, &[Role::Admin])?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::utils::jwt::generate_access_token;

    const TEST_SECRET: &str = "test_secret_key_at_least_32_characters_long";

    fn auth_user(role: Role) -> AuthUser {
        AuthUser {
            id: ObjectId::new(),
            email: "user@example.com".to_string(),
            is_active: true,
            role,
        }
    }

    #[test]
    fn test_check_role_allows_listed_role() {
        assert!(check_role(&auth_user(Role::Admin), &[Role::Admin]).is_ok());
    }

    #[test]
    fn test_check_role_rejects_unlisted_role() {
        let result = check_role(&auth_user(Role::Customer), &[Role::Admin]);
        match result {
            Err(AppError::Forbidden { message }) => {
                assert_eq!(message, "Access denied for customer.");
            }
            other => panic!("Expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn test_auth_user_from_claims() {
        let user = User::new(
            "Test User".to_string(),
            "test@example.com".to_string(),
            "$argon2id$hash".to_string(),
            Role::Admin,
            None,
            None,
        );
        let token = generate_access_token(&user, TEST_SECRET, 1).unwrap();
        let claims = validate_access_token(&token, TEST_SECRET).unwrap();

        let auth_user = AuthUser::try_from(claims).unwrap();
        assert_eq!(auth_user.id, user.id);
        assert_eq!(auth_user.role, Role::Admin);
        assert!(auth_user.is_active);
    }

    #[test]
    fn test_auth_user_from_claims_bad_subject() {
        let claims = Claims {
            sub: "not-an-object-id".to_string(),
            email: "test@example.com".to_string(),
            is_active: true,
            role: Role::Customer,
            iat: 0,
            exp: i64::MAX,
        };
        assert!(AuthUser::try_from(claims).is_err());
    }
}
