//! NASA APOD picture provider
//!
//! Issues `GET {endpoint}?api_key=...&date=YYYY-MM-DD` through the shared
//! [`FetchContext`] client. Every await point is raced against the context's
//! cancellation signal.

use chrono::{NaiveDate, Utc};
use url::Url;

use crate::config::ApodConfig;
use crate::error::{Error, FetchError, Result};
use crate::fetch::{FetchContext, PictureProvider};
use crate::types::PictureRecord;
use crate::utils::DATE_FORMAT;

/// First date served by the APOD API
pub const APOD_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1995, 6, 16) {
    Some(date) => date,
    None => panic!("invalid APOD epoch"),
};

/// Production [`PictureProvider`] backed by the NASA APOD HTTP API.
#[derive(Clone)]
pub struct ApodProvider {
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for ApodProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApodProvider")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl ApodProvider {
    /// Create a provider from the APOD section of the configuration.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the endpoint is not a valid URL.
    pub fn new(config: &ApodConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| Error::Config {
            message: format!("invalid APOD endpoint '{}': {}", config.endpoint, e),
            key: Some("APOD_ENDPOINT".to_string()),
        })?;

        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    /// Build the request URL for `date`, keeping any query already on the endpoint.
    fn request_url(&self, date: NaiveDate) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("date", &date.format(DATE_FORMAT).to_string());
        url
    }
}

#[async_trait::async_trait]
impl PictureProvider for ApodProvider {
    async fn get_picture(
        &self,
        ctx: &FetchContext,
        date: NaiveDate,
    ) -> std::result::Result<PictureRecord, FetchError> {
        validate_date(date, Utc::now().date_naive())?;

        let request = ctx.client().get(self.request_url(date));
        let response = ctx
            .run_until_cancelled(request.send())
            .await?
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                date,
            });
        }

        let body = ctx
            .run_until_cancelled(response.bytes())
            .await?
            .map_err(transport_error)?;

        let mut record: PictureRecord =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
                date,
                reason: e.to_string(),
            })?;

        if record.url.is_empty() && record.hdurl.is_empty() {
            return Err(FetchError::EmptyPayload { date });
        }
        record.apod_date = NaiveDate::parse_from_str(&record.date, DATE_FORMAT).ok();

        tracing::debug!(%date, title = %record.title, "Fetched picture");
        Ok(record)
    }
}

/// Reject dates the APOD API does not serve: before [`APOD_EPOCH`] or after `today`.
pub fn validate_date(date: NaiveDate, today: NaiveDate) -> std::result::Result<(), FetchError> {
    if date < APOD_EPOCH || date > today {
        return Err(FetchError::DateOutOfRange {
            date,
            earliest: APOD_EPOCH,
            latest: today,
        });
    }
    Ok(())
}

/// Map a reqwest error to a transport error without leaking the request URL,
/// which carries the API key.
fn transport_error(e: reqwest::Error) -> FetchError {
    let timed_out = e.is_timeout();
    let e = e.without_url();
    if timed_out {
        FetchError::Transport(format!("request timed out: {e}"))
    } else {
        FetchError::Transport(e.to_string())
    }
}
