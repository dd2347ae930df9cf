//! Credential verification, token issuance and password recovery.

use mongodb::bson::{DateTime, doc, oid::ObjectId};

use crate::config::{JwtConfig, OtpConfig};
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::repositories::{FindAllOptions, Repository};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::{jwt, otp};

/// Inputs for the reset-password flow. `password` and `confirm_password`
/// are equal once request validation has passed.
#[derive(Debug, Clone)]
pub struct ResetPasswordData {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub confirm_password: String,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    users: Repository<User>,
    jwt: JwtConfig,
    otp: OtpConfig,
}

impl AuthService {
    pub fn new(users: Repository<User>, jwt: JwtConfig, otp: OtpConfig) -> Self {
        Self { users, jwt, otp }
    }

    /// Verifies a credential pair.
    ///
    /// Returns the sanitized user when the password matches and the account
    /// is active. A matching password on an inactive account is
    /// `Unauthorized`; bad credentials are an absence, not an error.
    pub async fn validate_user(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let user = self
            .users
            .find_one(FindAllOptions::with_filter(doc! { "email": email }), None)
            .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        if !self.validate_password(&user, password) {
            return Ok(None);
        }

        if !user.is_active {
            return Err(AppError::unauthorized(
                "Your account is currently not active, contact support for assistance.",
            ));
        }

        Ok(Some(user.sanitized()))
    }

    /// Authenticates and issues a signed access token, stamping the
    /// last-login time on success.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(User, String)> {
        let user = self
            .validate_user(email, password)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        let access_token =
            jwt::generate_access_token(&user, &self.jwt.secret, self.jwt.access_token_expiration)?;
        self.update_last_login(user.id).await?;

        Ok((user, access_token))
    }

    /// Compares a plain password against the user's stored hash. Any
    /// verification failure counts as a mismatch.
    pub fn validate_password(&self, user: &User, password: &str) -> bool {
        user.password
            .as_deref()
            .map(|hash| verify_password(password, hash).unwrap_or(false))
            .unwrap_or(false)
    }

    /// Issues a one-time reset code for the account, failing with `NotFound`
    /// for unknown addresses. Mail delivery is not implemented; the code is
    /// only surfaced in debug logs.
    pub async fn forgot_password(&self, email: &str) -> AppResult<User> {
        let user = self
            .users
            .find_one(
                FindAllOptions {
                    filter: doc! { "email": email },
                    optimized: true,
                    ..Default::default()
                },
                None,
            )
            .await?;

        let Some(user) = user else {
            return Err(AppError::not_found(format!(
                "User with email '{email}' does not exist."
            )));
        };

        let code = otp::generate(&self.otp.secret, self.otp.step_seconds);
        tracing::debug!(
            email = %user.email,
            code = %code,
            "Password reset code generated; mail delivery is not implemented"
        );

        Ok(user.sanitized())
    }

    /// Resets the password after verifying the one-time code within the
    /// configured step window. Reusing the current password is a `Conflict`.
    pub async fn reset_password(&self, data: ResetPasswordData) -> AppResult<User> {
        let user = self
            .users
            .find_one_or_error(
                FindAllOptions::with_filter(doc! { "email": &data.email }),
                None,
            )
            .await?;

        if !otp::verify(
            &self.otp.secret,
            self.otp.step_seconds,
            self.otp.window,
            &data.otp,
        ) {
            return Err(AppError::bad_request("Invalid OTP"));
        }

        if self.validate_password(&user, &data.confirm_password) {
            return Err(AppError::conflict(
                "Current password cannot be used as new password.",
            ));
        }

        let password_hash = hash_password(&data.password)?;
        self.users
            .update_one(
                doc! { "_id": user.id },
                doc! { "$set": { "password": password_hash, "updatedAt": DateTime::now() } },
            )
            .await?;

        Ok(user.sanitized())
    }

    async fn update_last_login(&self, user_id: ObjectId) -> AppResult<()> {
        self.users
            .update_one(
                doc! { "_id": user_id },
                doc! { "$set": { "lastLogin": DateTime::now() } },
            )
            .await
    }
}
