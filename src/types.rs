//! Core types: date ranges and fetched picture records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// Ordered, chronological list of dates to fetch
pub type DateList = Vec<NaiveDate>;

/// Inclusive range of calendar dates with `start <= end`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`. A single-day range is allowed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::Validation(format!(
                "start_date {start} is after end_date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First date of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date of the range
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the range, both ends included
    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Expand the range into one date per day, in chronological order
    pub fn dates(&self) -> DateList {
        self.start.iter_days().take(self.day_count()).collect()
    }
}

/// Picture-of-the-day record returned by the APOD API for one date
///
/// `url` is the primary field surfaced to API clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PictureRecord {
    /// Date as reported by the provider (YYYY-MM-DD)
    #[serde(default)]
    pub date: String,

    /// Picture title
    #[serde(default)]
    pub title: String,

    /// Standard resolution URL
    #[serde(default)]
    pub url: String,

    /// High resolution URL (absent for videos)
    #[serde(default)]
    pub hdurl: String,

    /// Description of the picture
    #[serde(default)]
    pub explanation: String,

    /// `date` parsed as a calendar date, when well-formed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub apod_date: Option<NaiveDate>,
}
