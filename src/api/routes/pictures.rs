//! Picture handlers.

use super::{PicturesQuery, PicturesResponse};
use crate::api::AppState;
use crate::error::{Error, Result};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

/// GET /pictures - Picture URLs for every date in a range
#[utoipa::path(
    get,
    path = "/pictures",
    tag = "pictures",
    params(PicturesQuery),
    responses(
        (status = 200, description = "One picture URL per date, in chronological order", body = PicturesResponse),
        (status = 405, description = "Method not allowed", body = crate::error::ApiError),
        (status = 422, description = "Undecodable query, or missing, malformed, reversed, or out-of-archive dates", body = crate::error::ApiError),
        (status = 500, description = "Fetching at least one picture failed", body = crate::error::ApiError)
    )
)]
pub async fn get_pictures(
    State(state): State<AppState>,
    query: std::result::Result<Query<PicturesQuery>, QueryRejection>,
) -> Result<Json<PicturesResponse>> {
    let Query(query) = query.map_err(|rejection| {
        tracing::error!(error = %rejection, "Undecodable query string");
        Error::Validation(rejection.body_text())
    })?;

    let (start_date, end_date) = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => (start, end),
        _ => {
            tracing::error!("start_date and end_date are both required");
            return Err(Error::Validation(
                "start_date and end_date are both required".to_string(),
            ));
        }
    };

    match crate::pictures::get_pictures(
        state.provider.clone(),
        &state.config.fetch,
        &start_date,
        &end_date,
    )
    .await
    {
        Ok(urls) => Ok(Json(PicturesResponse { urls })),
        Err(e) => {
            tracing::error!(
                start_date = %start_date,
                end_date = %end_date,
                error = %e,
                "Failed to collect pictures"
            );
            Err(e)
        }
    }
}
