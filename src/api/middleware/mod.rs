//! Middleware stack: request IDs, request logging, bearer authentication
//! and the terminal error mapping.

mod auth;
mod error_handler;
mod logging;
mod request_id;

pub use auth::{AuthUser, auth_middleware, check_role, require_admin};
pub use error_handler::error_to_status_code;
pub use logging::logging_middleware;
pub use request_id::{RequestId, request_id_middleware};
