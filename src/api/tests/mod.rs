use super::*;
use crate::error::FetchError;
use crate::fetch::FetchContext;
use crate::types::PictureRecord;
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use std::time::Duration;
use tower::ServiceExt;


const DUMMY_URL: &str = "https://apod.nasa.gov/apod/image/1607/dummy_image.jpg";

/// Provider that answers every date except `fail_on` with a URL embedding the date.
struct TestProvider {
    fail_on: Option<NaiveDate>,
}

#[async_trait::async_trait]
impl PictureProvider for TestProvider {
    async fn get_picture(
        &self,
        _ctx: &FetchContext,
        date: NaiveDate,
    ) -> std::result::Result<PictureRecord, FetchError> {
        if Some(date) == self.fail_on {
            return Err(FetchError::Transport(
                "connection refused (api_key=secret)".to_string(),
            ));
        }
        Ok(PictureRecord {
            date: date.to_string(),
            title: "Dummy title".to_string(),
            url: format!("{DUMMY_URL}#{date}"),
            hdurl: String::new(),
            explanation: String::new(),
            apod_date: Some(date),
        })
    }
}

fn test_router(fail_on: Option<NaiveDate>) -> Router {
    create_router(Arc::new(TestProvider { fail_on }), Arc::new(Config::default()))
}

async fn send(app: Router, method: &str, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_binds_and_shuts_down() {
    let mut config = Config::default();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(start_api_server(
        Arc::new(TestProvider { fail_on: None }),
        Arc::new(config),
        async {
            let _ = rx.await;
        },
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let mut config = Config::default();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let app = create_router(Arc::new(TestProvider { fail_on: None }), Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = Config::default();
    config.server.api.cors_enabled = false;
    let app = create_router(Arc::new(TestProvider { fail_on: None }), Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}
