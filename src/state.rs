//! Application state for the Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::Settings;
use crate::db::Store;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Designed to be used with Axum's State extractor. Cloning is cheap since
/// services, repositories and the store are all reference-counted
/// internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the document store
    pub store: Store,
    /// Loaded application settings
    pub settings: Settings,
}

impl AppState {
    /// Creates a new AppState from a connected store and loaded settings.
    ///
    /// Initializes all repositories and services once; handlers receive
    /// them by reference through this state.
    pub fn new(store: Store, settings: Settings) -> Self {
        let repos = Repositories::new(&store);
        let services = Services::new(repos, settings.jwt.clone(), settings.otp.clone());
        Self {
            services,
            store,
            settings,
        }
    }
}
