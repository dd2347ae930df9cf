//! Repository layer for data access operations.
//!
//! One generic [`Repository`] parameterized per entity collection; query
//! shaping and session handling live in [`base`].

pub mod base;

pub use base::{
    FindAllOptions, Listing, PageOptions, Pagination, Relation, Repository, SortOrder,
};

use crate::db::Store;
use crate::models::{Category, Product, User};

/// Aggregates all repositories for convenient access.
///
/// Constructed once at startup and carried inside the application state;
/// cloning is cheap since collection handles are reference-counted.
#[derive(Clone)]
pub struct Repositories {
    pub users: Repository<User>,
    pub categories: Repository<Category>,
    pub products: Repository<Product>,
}

impl Repositories {
    /// Creates a new Repositories instance bound to the given store.
    pub fn new(store: &Store) -> Self {
        Self {
            users: Repository::new(store, "User", "users"),
            categories: Repository::new(store, "Category", "categories"),
            products: Repository::new(store, "Product", "products"),
        }
    }
}
