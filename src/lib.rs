//! # apod-collector
//!
//! Collects NASA Astronomy Picture of the Day (APOD) image URLs for a range
//! of dates, fetching the days concurrently under a fixed limit.
//!
//! ## Behavior
//!
//! - **Bounded** - at most `concurrent_requests` fetches are in flight at once
//! - **Fail-fast** - the first failed date cancels every sibling fetch and fails the run
//! - **All or nothing** - a successful run yields exactly one record per requested date
//! - **Ordered** - records come back in the order the dates were given
//!
//! ## Quick Start
//!
//! ```no_run
//! use apod_collector::{ApodProvider, Config, fetch_all};
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let provider = Arc::new(ApodProvider::new(&config.apod)?);
//!
//!     let dates = vec![
//!         NaiveDate::from_ymd_opt(2020, 4, 1).ok_or("bad date")?,
//!         NaiveDate::from_ymd_opt(2020, 4, 2).ok_or("bad date")?,
//!     ];
//!
//!     let records = fetch_all(&dates, provider, config.fetch.concurrent_requests).await?;
//!     for record in records {
//!         println!("{}: {}", record.date, record.url);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// NASA APOD HTTP provider
pub mod apod;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Bounded, cancellable fan-out over dates
pub mod fetch;
/// Date-range validation and URL collection
pub mod pictures;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use apod::ApodProvider;
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, FetchError, Result, ToHttpStatus};
pub use fetch::{FetchContext, FetchOrchestrator, PictureProvider, fetch_all, fetch_all_in_context};
pub use types::{DateList, DateRange, PictureRecord};

use std::sync::Arc;

/// Run the API server until a termination signal arrives.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use apod_collector::{ApodProvider, Config, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Arc::new(Config::default());
///     let provider = Arc::new(ApodProvider::new(&config.apod)?);
///
///     run_with_shutdown(provider, config).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(provider: Arc<dyn PictureProvider>, config: Arc<Config>) -> Result<()> {
    api::start_api_server(provider, config, wait_for_signal()).await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register signal handlers, using ctrl_c fallback");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
