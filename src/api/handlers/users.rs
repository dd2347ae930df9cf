//! User administration endpoints. The whole group is admin-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router, middleware};

use crate::api::dto::{ApiResponse, CreateUserRequest, ListQuery, UserResponse, parse_object_id};
use crate::api::middleware::{auth_middleware, require_admin};
use crate::error::AppResult;
use crate::repositories::Listing;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes (bearer authentication + admin role):
/// - `GET /` - list users with filters and pagination
/// - `POST /` - register a user
/// - `GET /{id}` - fetch one user
/// - `PATCH /{id}` - toggle the active flag
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(get_single).patch(toggle_active))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// GET /api/v1/users - List users
async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Listing<UserResponse>>>> {
    let users = state
        .services
        .users
        .get_all(query.page_options(), query.query_options())
        .await?;

    Ok(Json(ApiResponse::new(
        "Users fetched successfully.",
        users.map(UserResponse::from),
    )))
}

/// GET /api/v1/users/{id} - Fetch one user
async fn get_single(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let id = parse_object_id(&id, "id")?;
    let user = state.services.users.get_by_id(id).await?;

    Ok(Json(ApiResponse::new(
        "User fetched successfully.",
        UserResponse::from(user),
    )))
}

/// POST /api/v1/users - Register a user
async fn create(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state.services.users.create(payload.into_data()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "User created successfully.",
            UserResponse::from(user),
        )),
    ))
}

/// PATCH /api/v1/users/{id} - Toggle the active flag
async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let id = parse_object_id(&id, "id")?;
    let user = state.services.users.toggle_active(id).await?;

    Ok(Json(ApiResponse::new(
        "User status updated successfully.",
        UserResponse::from(user),
    )))
}
