//! Utility functions for date formatting and result projection

use crate::types::PictureRecord;

/// Date format used by the APOD API and the REST API query parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Project each record onto its primary URL, keeping the order received.
///
/// # Examples
///
/// ```
/// use apod_collector::types::PictureRecord;
/// use apod_collector::utils::collect_urls;
///
/// let record = PictureRecord {
///     date: "2020-04-05".to_string(),
///     title: "Potato Pod".to_string(),
///     url: "https://apod.nasa.gov/apod/image/2004/PotatoPod_Sutton_960.jpg".to_string(),
///     hdurl: String::new(),
///     explanation: String::new(),
///     apod_date: None,
/// };
/// assert_eq!(
///     collect_urls(&[record]),
///     vec!["https://apod.nasa.gov/apod/image/2004/PotatoPod_Sutton_960.jpg".to_string()]
/// );
/// ```
#[must_use]
pub fn collect_urls(records: &[PictureRecord]) -> Vec<String> {
    records.iter().map(|record| record.url.clone()).collect()
}
