//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::repository::ProductRepository;

/// Application state shared across handlers
///
/// Generic over the storage backend so the same handlers serve any
/// [`ProductRepository`]. Cloning only bumps reference counts.
pub struct AppState<R> {
    config: Arc<Config>,
    repository: Arc<R>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> AppState<R> {
    pub fn new(config: Config, repository: R) -> Self {
        Self {
            config: Arc::new(config),
            repository: Arc::new(repository),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the storage backend
    pub fn repository(&self) -> &R {
        &self.repository
    }
}
