//! Product catalog endpoints. Reads are public; mutations are admin-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router, middleware};

use crate::api::dto::{
    ApiResponse, CreateProductRequest, ListQuery, ProductResponse, ProductViewResponse,
    UpdateProductRequest, parse_object_id,
};
use crate::api::middleware::{AuthUser, auth_middleware, require_admin};
use crate::error::AppResult;
use crate::repositories::Listing;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - `GET /`, `GET /{id}` - public reads
/// - `POST /`, `PUT /{id}`, `PATCH /{id}`, `DELETE /{id}` - admin mutations
pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create))
        .route("/{id}", put(update).patch(toggle_stock).delete(remove))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(index))
        .route("/{id}", get(get_single))
        .merge(admin)
}

/// GET /api/v1/products - List products
async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Listing<ProductViewResponse>>>> {
    let products = state
        .services
        .products
        .get_all(query.page_options(), query.query_options())
        .await?;

    Ok(Json(ApiResponse::new(
        "Products fetched successfully.",
        products.map(ProductViewResponse::from),
    )))
}

/// GET /api/v1/products/{id} - Fetch one product with relations
async fn get_single(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductViewResponse>>> {
    let id = parse_object_id(&id, "id")?;
    let product = state.services.products.get_by_id(id).await?;

    Ok(Json(ApiResponse::new(
        "Product fetched successfully.",
        ProductViewResponse::from(product),
    )))
}

/// POST /api/v1/products - Create a product
async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductResponse>>)> {
    let product = state
        .services
        .products
        .create(auth_user.id, payload.into_data()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Product created successfully.",
            ProductResponse::from(product),
        )),
    ))
}

/// PUT /api/v1/products/{id} - Update a product
async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductResponse>>> {
    let id = parse_object_id(&id, "id")?;
    let product = state
        .services
        .products
        .update(id, payload.into_data()?)
        .await?;

    Ok(Json(ApiResponse::new(
        "Product updated successfully.",
        ProductResponse::from(product),
    )))
}

/// PATCH /api/v1/products/{id} - Toggle the stock flag
async fn toggle_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductResponse>>> {
    let id = parse_object_id(&id, "id")?;
    let product = state.services.products.toggle_stock(id).await?;

    Ok(Json(ApiResponse::new(
        "Product stock updated successfully.",
        ProductResponse::from(product),
    )))
}

/// DELETE /api/v1/products/{id} - Delete a product
async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_object_id(&id, "id")?;
    state.services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
