//! Current-user endpoints: profile reads and self-service mutations.

use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Extension, Json, Router, extract::State, middleware};

use crate::api::dto::{ApiResponse, ChangePasswordRequest, MessageResponse, UpdateProfileRequest, UserResponse};
use crate::api::middleware::{AuthUser, auth_middleware};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes (all behind bearer authentication):
/// - `GET /` - current user's profile
/// - `PUT /` - update profile fields
/// - `DELETE /` - delete the account
/// - `PATCH /change-password` - change password
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_me).put(update_profile).delete(delete_account))
        .route("/change-password", patch(change_password))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// GET /api/v1/me - Current user's profile
async fn get_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.users.get_by_id(auth_user.id).await?;
    Ok(Json(ApiResponse::new(
        "Profile fetched successfully.",
        UserResponse::from(user),
    )))
}

/// PUT /api/v1/me - Update profile; only supplied fields change
async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state
        .services
        .users
        .update_profile(auth_user.id, payload.into_data())
        .await?;

    Ok(Json(ApiResponse::new(
        "Profile updated successfully.",
        UserResponse::from(user),
    )))
}

/// DELETE /api/v1/me - Delete the account
async fn delete_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<StatusCode> {
    state.services.users.delete_account(auth_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/me/change-password - Change password
async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .users
        .change_password(auth_user.id, payload.into_data())
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully.")))
}
