//! Application state shared across handlers.

use piwell_core::config::AppConfig;
use piwell_core::{ChunkSource, UncachedChunkSource};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Digit source backing the API.
    pub source: Arc<dyn ChunkSource>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The source is opened lazily per request, so a missing digit file does
    /// not prevent startup.
    ///
    /// # Panics
    ///
    /// Panics if the source configuration is invalid.
    pub fn new(config: AppConfig) -> Self {
        if let Err(error) = config.validate() {
            panic!("Invalid source configuration: {}", error);
        }

        let source = Arc::new(UncachedChunkSource::from_config(&config.source));

        Self {
            config: Arc::new(config),
            source,
        }
    }
}
