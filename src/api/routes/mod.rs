//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`pictures`] - Picture URLs over a date range
//! - [`system`] - Health, OpenAPI, fallbacks

use serde::{Deserialize, Serialize};

mod pictures;
mod system;

pub use pictures::*;
pub use system::*;

// ============================================================================
// Query/Response Types (shared across handlers)
// ============================================================================

/// Query parameters for GET /pictures
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PicturesQuery {
    /// First date of the range (YYYY-MM-DD)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last date of the range, inclusive (YYYY-MM-DD)
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Response body for GET /pictures
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PicturesResponse {
    /// Picture URLs in chronological order
    pub urls: Vec<String>,
}
