//! End-to-end tests against a mock APOD server
//!
//! Drives the real [`ApodProvider`] through [`fetch_all`] and the HTTP router,
//! with wiremock standing in for the NASA API.

mod common;

use apod_collector::api::create_router;
use apod_collector::config::{ApodConfig, FetchConfig};
use apod_collector::{ApodProvider, Error, FetchError, fetch_all, pictures};
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use common::{
    TEST_API_KEY, date, image_url, mock_config, mock_provider, mount_picture, mount_range,
    mount_status,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;
use wiremock::MockServer;

// ============================================================================
// Orchestration through the real provider
// ============================================================================

#[tokio::test]
async fn test_fetch_all_returns_one_record_per_date() {
    let server = MockServer::start().await;
    mount_range(&server, date(2020, 4, 1), date(2020, 4, 5)).await;

    let dates: Vec<_> = (1..=5).map(|d| date(2020, 4, d)).collect();
    let records = fetch_all(&dates, mock_provider(&server), 2).await.unwrap();

    assert_eq!(records.len(), 5);
    for (record, day) in records.iter().zip(&dates) {
        assert_eq!(record.apod_date, Some(*day));
        assert_eq!(record.url, image_url(*day));
    }
}

#[tokio::test]
async fn test_fetch_all_keeps_input_order_when_responses_arrive_out_of_order() {
    let server = MockServer::start().await;
    mount_picture(&server, date(2020, 4, 1), Duration::from_millis(300)).await;
    mount_picture(&server, date(2020, 4, 2), Duration::from_millis(150)).await;
    mount_picture(&server, date(2020, 4, 3), Duration::ZERO).await;

    let dates = vec![date(2020, 4, 1), date(2020, 4, 2), date(2020, 4, 3)];
    let records = fetch_all(&dates, mock_provider(&server), 3).await.unwrap();

    let returned: Vec<_> = records.iter().map(|r| r.apod_date.unwrap()).collect();
    assert_eq!(returned, dates);
}

#[tokio::test]
async fn test_failed_date_cancels_slow_siblings() {
    let server = MockServer::start().await;
    mount_picture(&server, date(2020, 4, 1), Duration::from_secs(5)).await;
    mount_status(&server, date(2020, 4, 2), 500).await;
    mount_picture(&server, date(2020, 4, 3), Duration::from_secs(5)).await;

    let dates = vec![date(2020, 4, 1), date(2020, 4, 2), date(2020, 4, 3)];
    let started = Instant::now();
    let err = fetch_all(&dates, mock_provider(&server), 3)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::Status {
            status: 500,
            date: date(2020, 4, 2)
        }
    );
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "in-flight siblings should be abandoned, took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_failure_with_single_slot_stops_remaining_dates() {
    let server = MockServer::start().await;
    mount_status(&server, date(2020, 4, 1), 429).await;
    mount_range(&server, date(2020, 4, 2), date(2020, 4, 4)).await;

    let dates: Vec<_> = (1..=4).map(|d| date(2020, 4, d)).collect();
    let err = fetch_all(&dates, mock_provider(&server), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 429, .. }));
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "no date after the failure should be fetched");
}

#[tokio::test]
async fn test_out_of_range_date_fails_without_request() {
    let server = MockServer::start().await;
    mount_range(&server, date(2020, 4, 1), date(2020, 4, 1)).await;

    let dates = vec![date(1995, 6, 15)];
    let err = fetch_all(&dates, mock_provider(&server), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::DateOutOfRange { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_error_does_not_leak_api_key() {
    // Nothing listens on port 1
    let provider = ApodProvider::new(&ApodConfig {
        endpoint: "http://127.0.0.1:1/planetary/apod".to_string(),
        api_key: TEST_API_KEY.to_string(),
    })
    .unwrap();

    let err = fetch_all(&[date(2020, 4, 1)], Arc::new(provider), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert!(!err.to_string().contains(TEST_API_KEY));
}

// ============================================================================
// Range collection
// ============================================================================

#[tokio::test]
async fn test_get_pictures_collects_urls_for_range() {
    let server = MockServer::start().await;
    mount_range(&server, date(2020, 2, 27), date(2020, 3, 2)).await;

    let config = FetchConfig {
        concurrent_requests: 2,
        request_timeout: Duration::from_secs(10),
    };
    let urls = pictures::get_pictures(mock_provider(&server), &config, "2020-02-27", "2020-03-02")
        .await
        .unwrap();

    // 2020 is a leap year
    assert_eq!(urls.len(), 5);
    assert_eq!(urls[2], image_url(date(2020, 2, 29)));
}

#[tokio::test]
async fn test_get_pictures_rejects_bad_input_before_fetching() {
    let server = MockServer::start().await;
    let config = FetchConfig::default();

    for (start, end) in [
        ("2020-04-03", "2020-04-01"),
        ("2020/04/01", "2020/04/03"),
        ("1990-01-01", "2020-04-01"),
    ] {
        let err = pictures::get_pictures(mock_provider(&server), &config, start, end)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{start}..{end}: {err}");
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// HTTP surface
// ============================================================================

#[tokio::test]
async fn test_http_pictures_end_to_end() {
    let server = MockServer::start().await;
    mount_range(&server, date(2020, 4, 1), date(2020, 4, 3)).await;

    let config = Arc::new(mock_config(&server, 2));
    let app = create_router(mock_provider(&server), config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/pictures?start_date=2020-04-01&end_date=2020-04-03")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let urls: Vec<String> = serde_json::from_value(json["urls"].clone()).unwrap();
    assert_eq!(
        urls,
        vec![
            image_url(date(2020, 4, 1)),
            image_url(date(2020, 4, 2)),
            image_url(date(2020, 4, 3)),
        ]
    );
}

#[tokio::test]
async fn test_http_range_before_archive_is_rejected_without_requests() {
    let server = MockServer::start().await;
    mount_range(&server, date(1995, 6, 16), date(1995, 6, 20)).await;

    let config = Arc::new(mock_config(&server, 2));
    let app = create_router(mock_provider(&server), config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/pictures?start_date=1990-01-01&end_date=1995-06-20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_http_upstream_failure_is_opaque_500() {
    let server = MockServer::start().await;
    mount_picture(&server, date(2020, 4, 1), Duration::ZERO).await;
    mount_status(&server, date(2020, 4, 2), 503).await;

    let config = Arc::new(mock_config(&server, 2));
    let app = create_router(mock_provider(&server), config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/pictures?start_date=2020-04-01&end_date=2020-04-02")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(!text.contains("503"), "upstream detail should not reach the client: {text}");
    assert!(!text.contains(TEST_API_KEY));
}
