use std::sync::Arc;

use crate::config::AppConfig;

/// Shared by every handler: the store and the configuration it was started with.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub config: Arc<AppConfig>,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

// Derived Clone would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}
