//! Application state shared across handlers

use std::sync::Arc;

use application::PronunciationService;

/// Shared application state
///
/// Providers are built once at startup and shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Tutoring flows over the configured providers
    pub pronunciation: Arc<PronunciationService>,
}

impl AppState {
    /// Wrap a service into shareable state
    pub fn new(pronunciation: PronunciationService) -> Self {
        Self {
            pronunciation: Arc::new(pronunciation),
        }
    }
}
