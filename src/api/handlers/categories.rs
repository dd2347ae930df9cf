//! Category catalog endpoints. Reads are public; mutations are admin-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router, middleware};

use crate::api::dto::{
    ApiResponse, CategoryResponse, CategoryViewResponse, CreateCategoryRequest, ListQuery,
    ProductViewResponse, UpdateCategoryRequest, parse_object_id,
};
use crate::api::middleware::{AuthUser, auth_middleware, require_admin};
use crate::error::AppResult;
use crate::repositories::Listing;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - `GET /`, `GET /{id}`, `GET /{id}/products` - public reads
/// - `POST /`, `PUT /{id}`, `PATCH /{id}`, `DELETE /{id}` - admin mutations
pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create))
        .route("/{id}", put(update).patch(toggle_status).delete(remove))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(index))
        .route("/{id}", get(get_single))
        .route("/{id}/products", get(get_products))
        .merge(admin)
}

/// GET /api/v1/categories - List categories
async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Listing<CategoryViewResponse>>>> {
    let categories = state
        .services
        .categories
        .get_all(query.page_options(), query.query_options())
        .await?;

    Ok(Json(ApiResponse::new(
        "Categories fetched successfully.",
        categories.map(CategoryViewResponse::from),
    )))
}

/// GET /api/v1/categories/{id} - Fetch one category with relations
async fn get_single(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryViewResponse>>> {
    let id = parse_object_id(&id, "id")?;
    let category = state.services.categories.get_by_id(id).await?;

    Ok(Json(ApiResponse::new(
        "Category fetched successfully.",
        CategoryViewResponse::from(category),
    )))
}

/// GET /api/v1/categories/{id}/products - List the category's products
async fn get_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Listing<ProductViewResponse>>>> {
    let id = parse_object_id(&id, "id")?;

    let mut options = query.query_options();
    options.category = Some(id);

    let products = state
        .services
        .products
        .get_all(query.page_options(), options)
        .await?;

    Ok(Json(ApiResponse::new(
        "Products fetched successfully.",
        products.map(ProductViewResponse::from),
    )))
}

/// POST /api/v1/categories - Create a category
async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CategoryResponse>>)> {
    let category = state
        .services
        .categories
        .create(auth_user.id, payload.name, payload.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Category created successfully.",
            CategoryResponse::from(category),
        )),
    ))
}

/// PUT /api/v1/categories/{id} - Update a category
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<CategoryResponse>>> {
    let id = parse_object_id(&id, "id")?;
    let category = state
        .services
        .categories
        .update(id, payload.into_data())
        .await?;

    Ok(Json(ApiResponse::new(
        "Category updated successfully.",
        CategoryResponse::from(category),
    )))
}

/// PATCH /api/v1/categories/{id} - Toggle the active flag
async fn toggle_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<CategoryResponse>>> {
    let id = parse_object_id(&id, "id")?;
    let category = state.services.categories.toggle_status(id).await?;

    Ok(Json(ApiResponse::new(
        "Category status updated successfully.",
        CategoryResponse::from(category),
    )))
}

/// DELETE /api/v1/categories/{id} - Delete a category
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_object_id(&id, "id")?;
    state.services.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
