//! HTTP request handlers, grouped per route prefix.

pub mod auth;
pub mod categories;
pub mod health;
pub mod me;
pub mod products;
pub mod users;
