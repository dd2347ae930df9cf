//! Service layer for business logic operations.
//!
//! Services compose the generic repository with entity-specific rules:
//! credential checks, uniqueness checks, relation expansion and
//! transactional mutations.

mod auth_service;
mod category_service;
mod product_service;
mod user_service;

pub use auth_service::{AuthService, ResetPasswordData};
pub use category_service::{CategoryService, UpsertCategoryData};
pub use product_service::{CreateProductData, ProductService, UpdateProductData};
pub use user_service::{ChangePasswordData, CreateUserData, UpdateProfileData, UserService};

use mongodb::bson::oid::ObjectId;

use crate::config::{JwtConfig, OtpConfig};
use crate::models::Role;
use crate::repositories::{Repositories, SortOrder};

/// Filter and ordering inputs shared by the list operations.
///
/// A free-text `search` term replaces the other filters with a
/// case-insensitive match across the entity's searchable fields.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub search: Option<String>,
    pub category: Option<ObjectId>,
    pub in_stock: Option<bool>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

/// Aggregates all services for convenient access.
///
/// Constructed once at process start and passed by reference to request
/// handlers through the application state; no global singletons.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub categories: CategoryService,
    pub products: ProductService,
}

impl Services {
    /// Creates a new Services instance from Repositories and the auth
    /// configuration.
    pub fn new(repos: Repositories, jwt: JwtConfig, otp: OtpConfig) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), jwt, otp),
            users: UserService::new(repos.users.clone()),
            categories: CategoryService::new(repos.categories.clone(), repos.users.clone(), repos.products.clone()),
            products: ProductService::new(repos.products, repos.categories, repos.users),
        }
    }
}
