//! Bounded fetch orchestration - fail-fast, semaphore-gated fan-out over a date list.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::NaiveDate;
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::types::PictureRecord;

use super::context::{FetchContext, PictureProvider};

/// Default per-request timeout used by [`fetch_all`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Single-assignment slot holding the first error of a run.
type FirstError = Arc<OnceLock<FetchError>>;

/// Orchestrator with its concurrency limit and request timeout fixed up front.
///
/// Each [`run`](Self::run) gets its own [`FetchContext`], so runs never share
/// cancellation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchOrchestrator {
    concurrency: usize,
    request_timeout: Duration,
}

impl FetchOrchestrator {
    /// Create an orchestrator admitting at most `concurrency` fetches at once.
    ///
    /// # Errors
    ///
    /// [`FetchError::InvalidConcurrency`] when `concurrency` is zero.
    pub fn new(concurrency: usize, request_timeout: Duration) -> Result<Self, FetchError> {
        if concurrency == 0 {
            return Err(FetchError::InvalidConcurrency);
        }
        Ok(Self {
            concurrency,
            request_timeout,
        })
    }

    /// Create an orchestrator from the fetch section of the configuration.
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        Self::new(config.concurrent_requests, config.request_timeout)
    }

    /// Maximum number of fetches in flight.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Timeout applied to every request of a run.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Fetch one record per date in a fresh context.
    ///
    /// Same semantics as [`fetch_all_in_context`].
    pub async fn run(
        &self,
        dates: &[NaiveDate],
        provider: Arc<dyn PictureProvider>,
    ) -> Result<Vec<PictureRecord>, FetchError> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }
        let ctx = FetchContext::new(self.request_timeout)?;
        fetch_all_in_context(&ctx, dates, provider, self.concurrency).await
    }
}

/// Fetch one record per date with a fresh [`FetchContext`] using
/// [`DEFAULT_REQUEST_TIMEOUT`].
///
/// See [`fetch_all_in_context`] for the concurrency and failure semantics.
pub async fn fetch_all(
    dates: &[NaiveDate],
    provider: Arc<dyn PictureProvider>,
    concurrency: usize,
) -> Result<Vec<PictureRecord>, FetchError> {
    FetchOrchestrator::new(concurrency, DEFAULT_REQUEST_TIMEOUT)?
        .run(dates, provider)
        .await
}

/// Fetch one record per date, never running more than `concurrency` fetches at once.
///
/// - Dates are admitted in input order; each fetch holds one semaphore permit
///   until it reaches a terminal state.
/// - The first failing fetch records its error and cancels `ctx`. Admission stops,
///   in-flight fetches observe the cancellation, and the run resolves to that error.
/// - Every admitted fetch is joined before returning. Dropping the returned future
///   aborts all spawned fetches.
/// - On success the records are returned in input-date order.
///
/// An empty `dates` slice returns an empty vector without invoking the provider.
///
/// # Errors
///
/// [`FetchError::InvalidConcurrency`] when `concurrency` is zero, otherwise the
/// first error observed among the fetches.
pub async fn fetch_all_in_context(
    ctx: &FetchContext,
    dates: &[NaiveDate],
    provider: Arc<dyn PictureProvider>,
    concurrency: usize,
) -> Result<Vec<PictureRecord>, FetchError> {
    if concurrency == 0 {
        return Err(FetchError::InvalidConcurrency);
    }
    if dates.is_empty() {
        return Ok(Vec::new());
    }

    let permits = Arc::new(Semaphore::new(concurrency));
    let first_error: FirstError = Arc::new(OnceLock::new());
    let mut tasks: JoinSet<Option<(usize, PictureRecord)>> = JoinSet::new();

    for (index, &date) in dates.iter().enumerate() {
        let permit = tokio::select! {
            biased;
            _ = ctx.cancelled() => break,
            permit = Arc::clone(&permits).acquire_owned() => match permit {
                Ok(permit) => permit,
                // The semaphore is never closed while the run is alive
                Err(_) => break,
            },
        };

        let ctx = ctx.clone();
        let provider = Arc::clone(&provider);
        let first_error = Arc::clone(&first_error);

        tasks.spawn(async move {
            let _permit = permit;
            tracing::debug!(%date, "Fetch admitted");

            let outcome = if ctx.is_cancelled() {
                Err(FetchError::Cancelled)
            } else {
                AssertUnwindSafe(provider.get_picture(&ctx, date))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        tracing::error!(%date, "Fetch panicked");
                        Err(FetchError::TaskFailed(format!(
                            "fetch for {date} panicked: {}",
                            panic_message(payload.as_ref())
                        )))
                    })
            };

            match outcome {
                Ok(record) => Some((index, record)),
                Err(e) => {
                    record_failure(&ctx, &first_error, e);
                    None
                }
            }
        });
    }

    let admitted = tasks.len();
    let mut collected: Vec<(usize, PictureRecord)> = Vec::with_capacity(admitted);

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(entry)) => collected.push(entry),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "Fetch task panicked");
                record_failure(ctx, &first_error, FetchError::TaskFailed(e.to_string()));
            }
        }
    }

    if let Some(error) = first_error.get() {
        tracing::warn!(
            admitted,
            total = dates.len(),
            error = %error,
            "Fetch run failed"
        );
        return Err(error.clone());
    }

    if collected.len() != dates.len() {
        // Admission only stops early on cancellation, which always records an error
        return Err(FetchError::Cancelled);
    }
    collected.sort_unstable_by_key(|(index, _)| *index);
    Ok(collected.into_iter().map(|(_, record)| record).collect())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

/// Store `error` if it is the first of the run, then cancel the shared context.
///
/// The slot is written before cancelling so that any cancellation error raised
/// by a sibling fetch always loses to the failure that caused it.
fn record_failure(ctx: &FetchContext, first_error: &OnceLock<FetchError>, error: FetchError) {
    if !error.is_cancelled() {
        tracing::warn!(error = %error, "Fetch failed, cancelling remaining fetches");
    }
    let _ = first_error.set(error);
    ctx.cancel();
}
