//! Common test utilities for apod-collector integration tests

#![allow(dead_code)]

use apod_collector::config::ApodConfig;
use apod_collector::{ApodProvider, Config};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock APOD endpoint is served under
pub const APOD_PATH: &str = "/planetary/apod";

/// API key the tests send; never expected to show up in error output
pub const TEST_API_KEY: &str = "test-secret-key";

/// Build a date, panicking on invalid input
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Image URL the mock server returns for `date`
pub fn image_url(date: NaiveDate) -> String {
    format!("https://apod.nasa.gov/apod/image/{date}/picture.jpg")
}

/// Configuration pointing at `server` with the given concurrency limit
pub fn mock_config(server: &MockServer, concurrent_requests: usize) -> Config {
    let mut config = Config::default();
    config.apod = ApodConfig {
        endpoint: format!("{}{}", server.uri(), APOD_PATH),
        api_key: TEST_API_KEY.to_string(),
    };
    config.fetch.concurrent_requests = concurrent_requests;
    config.fetch.request_timeout = Duration::from_secs(10);
    config
}

/// Provider pointing at `server`
pub fn mock_provider(server: &MockServer) -> Arc<ApodProvider> {
    Arc::new(ApodProvider::new(&mock_config(server, 1).apod).expect("valid mock endpoint"))
}

/// Serve a successful APOD payload for `date` after `delay`
pub async fn mount_picture(server: &MockServer, date: NaiveDate, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(APOD_PATH))
        .and(query_param("api_key", TEST_API_KEY))
        .and(query_param("date", date.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "date": date.to_string(),
                    "title": format!("Picture for {date}"),
                    "url": image_url(date),
                    "hdurl": image_url(date).replace(".jpg", "_hd.jpg"),
                    "explanation": "A picture of the sky.",
                    "media_type": "image",
                    "service_version": "v1"
                }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Serve an error status for `date`
pub async fn mount_status(server: &MockServer, date: NaiveDate, status: u16) {
    Mock::given(method("GET"))
        .and(path(APOD_PATH))
        .and(query_param("date", date.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": { "code": "OVER_RATE_LIMIT", "message": "rate limited" }
        })))
        .mount(server)
        .await;
}

/// Serve a successful picture for every day in `start..=end`
pub async fn mount_range(server: &MockServer, start: NaiveDate, end: NaiveDate) {
    for day in start.iter_days().take_while(|d| *d <= end) {
        mount_picture(server, day, Duration::ZERO).await;
    }
}
