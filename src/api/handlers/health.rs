//! Liveness endpoint and the unknown-route fallback.

use axum::Json;
use axum::extract::State;
use axum::http::{Method, Uri};
use serde_json::json;

use crate::api::dto::ApiResponse;
use crate::config::Environment;
use crate::error::AppError;
use crate::state::AppState;

/// GET / - liveness check with basic runtime information.
pub async fn index(State(state): State<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::new(
        "Yea! we're up and running",
        json!({
            "port": state.settings.server.port,
            "environment": Environment::from_env().as_str(),
        }),
    ))
}

/// Fallback for unknown routes.
pub async fn missing_route(method: Method, uri: Uri) -> AppError {
    AppError::not_found(format!(
        "You missed the road. Can not {} {} on this server",
        method,
        uri.path()
    ))
}
