//! Router configuration for the API.
//!
//! Centralized route registration and middleware wiring. Authenticated
//! groups carry their own auth/role layers; CORS, compression, logging and
//! request-id middleware wrap the whole application.

use axum::http::HeaderValue;
use axum::{Router, middleware, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/auth", handlers::auth::routes())
        .nest("/me", handlers::me::routes(state.clone()))
        .nest("/users", handlers::users::routes(state.clone()))
        .nest("/categories", handlers::categories::routes(state.clone()))
        .nest("/products", handlers::products::routes(state.clone()));

    Router::new()
        .route("/", get(handlers::health::index))
        .nest("/api/v1", api_routes)
        .fallback(handlers::health::missing_route)
        .layer(cors_layer(&state.settings.server.allowed_origins))
        .layer(CompressionLayer::new())
        // Middleware is applied in reverse order - last added runs first,
        // so the request id exists before the logger reads it.
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// An empty origin list opens CORS up entirely (development); otherwise
/// only the configured origins are allowed.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
