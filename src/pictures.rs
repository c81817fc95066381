//! Pictures controller - validates a requested date range, fetches every
//! picture in it, and projects the results onto their URLs.

use std::sync::{Arc, LazyLock};
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use regex::Regex;

use crate::apod::APOD_EPOCH;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::fetch::{FetchOrchestrator, PictureProvider};
use crate::types::DateRange;
use crate::utils::{DATE_FORMAT, collect_urls};

#[allow(clippy::expect_used)]
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[012])-(0[1-9]|[12][0-9]|3[01])$").expect("date pattern is valid")
});

/// Whether both parameters look like `YYYY-MM-DD` dates.
///
/// This is a shape check only; `2021-02-31` passes here and is rejected by
/// [`parse_date_range`].
pub fn validate_params(start_date: &str, end_date: &str) -> bool {
    DATE_RE.is_match(start_date) && DATE_RE.is_match(end_date)
}

/// Parse both parameters into a [`DateRange`].
///
/// # Errors
///
/// [`Error::Validation`] if either string is not a real calendar date or
/// `start_date` falls after `end_date`.
pub fn parse_date_range(start_date: &str, end_date: &str) -> Result<DateRange> {
    let start = parse_date("start_date", start_date)?;
    let end = parse_date("end_date", end_date)?;
    DateRange::new(start, end)
}

/// Reject ranges reaching outside the days the APOD API serves, before any
/// date list is built for them.
///
/// # Errors
///
/// [`Error::Validation`] if `range` starts before [`APOD_EPOCH`] or ends after `today`.
pub fn check_window(range: &DateRange, today: NaiveDate) -> Result<()> {
    if range.start() < APOD_EPOCH || range.end() > today {
        return Err(Error::Validation(format!(
            "dates must fall between {APOD_EPOCH} and {today}, got {} to {}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| Error::Validation(format!("{name} '{value}': {e}")))
}

/// Fetch the picture URL of every date between `start_date` and `end_date` inclusive.
///
/// URLs are returned in chronological order. Any failing fetch fails the whole
/// request; no partial list is ever returned.
pub async fn get_pictures(
    provider: Arc<dyn PictureProvider>,
    config: &FetchConfig,
    start_date: &str,
    end_date: &str,
) -> Result<Vec<String>> {
    if !validate_params(start_date, end_date) {
        return Err(Error::Validation(format!(
            "dates must be YYYY-MM-DD, got start_date '{start_date}' and end_date '{end_date}'"
        )));
    }
    let range = parse_date_range(start_date, end_date)?;
    check_window(&range, Utc::now().date_naive())?;
    let dates = range.dates();

    tracing::info!(
        start = %range.start(),
        end = %range.end(),
        dates = dates.len(),
        concurrency = config.concurrent_requests,
        "Fetching pictures"
    );
    let started = Instant::now();

    let orchestrator = FetchOrchestrator::from_config(config)?;
    let records = orchestrator.run(&dates, provider).await?;

    tracing::info!(
        dates = dates.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fetching successful"
    );

    Ok(collect_urls(&records))
}
