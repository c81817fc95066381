//! Application state for the API server

use crate::Config;
use crate::fetch::PictureProvider;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// Provider used to fetch each date's picture
    pub provider: Arc<dyn PictureProvider>,

    /// Configuration (read-only at runtime)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(provider: Arc<dyn PictureProvider>, config: Arc<Config>) -> Self {
        Self { provider, config }
    }
}
