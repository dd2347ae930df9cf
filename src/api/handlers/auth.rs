//! Authentication handlers: login and password recovery.

use axum::{Json, Router, extract::State, routing::post};

use crate::api::dto::{
    ApiResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, ResetPasswordRequest,
    UserResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - `POST /` - authenticate and issue an access token
/// - `POST /forgot-password` - issue a one-time reset code
/// - `POST /reset-password` - set a new password with a valid code
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

/// POST /api/v1/auth - Authenticate user
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let (user, access_token) = state
        .services
        .auth
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::new(
        "Login successful.",
        LoginResponse {
            user: user.into(),
            access_token,
        },
    )))
}

/// POST /api/v1/auth/forgot-password - Issue a reset code
async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.auth.forgot_password(&payload.email).await?;

    Ok(Json(ApiResponse::new(
        "Password reset code issued.",
        UserResponse::from(user),
    )))
}

/// POST /api/v1/auth/reset-password - Reset with a one-time code
async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .services
        .auth
        .reset_password(payload.into_data())
        .await?;

    Ok(Json(ApiResponse::new(
        "Password reset successfully.",
        UserResponse::from(user),
    )))
}
