//! HTTP server exposing `GET /pictures` over the NASA APOD API.
//!
//! Configuration comes from the environment (and `.env`); see
//! [`apod_collector::Config::from_env`].

use apod_collector::{ApodProvider, Config, run_with_shutdown};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Arc::new(Config::from_env()?);
    let provider = Arc::new(ApodProvider::new(&config.apod)?);

    tracing::info!(
        endpoint = %config.apod.endpoint,
        concurrent_requests = config.fetch.concurrent_requests,
        timeout_secs = config.fetch.request_timeout.as_secs(),
        "Starting APOD collector"
    );

    run_with_shutdown(provider, config).await?;
    Ok(())
}
