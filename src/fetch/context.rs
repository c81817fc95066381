//! Fetch context - shared cancellation signal, transport handle, and picture provider trait.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::error::FetchError;
use crate::types::PictureRecord;

/// Cancellable work context shared by every fetch of a single orchestration run.
///
/// Carries one cancellation signal and one timeout-bounded `reqwest::Client`.
/// Cloning is cheap: clones observe the same signal and reuse the same
/// connection pool.
#[derive(Clone, Debug)]
pub struct FetchContext {
    cancel_token: CancellationToken,
    client: reqwest::Client,
    timeout: Duration,
}

impl FetchContext {
    /// Create a fresh context whose transport applies `timeout` to every request.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("apod-collector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self::with_client(client, timeout))
    }

    /// Create a context around an existing client.
    ///
    /// `timeout` is informational here; the client is expected to enforce it.
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            client,
            timeout,
        }
    }

    /// Signal cancellation to every fetch sharing this context. Idempotent.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Future that resolves once the context is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel_token.cancelled()
    }

    /// Shared HTTP client for this run.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Per-request timeout applied by the client.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Drive `fut` to completion unless the context is cancelled first.
    ///
    /// Cancellation wins ties, so a fetch that was cancelled while its I/O was
    /// also ready still reports [`FetchError::Cancelled`].
    pub async fn run_until_cancelled<F>(&self, fut: F) -> Result<F::Output, FetchError>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => Err(FetchError::Cancelled),
            output = fut => Ok(output),
        }
    }
}

/// Abstraction over fetching the picture of a single date, enabling testability.
///
/// Implementations must consult `ctx` at every I/O boundary and return
/// [`FetchError::Cancelled`] once it has been cancelled.
#[async_trait::async_trait]
pub trait PictureProvider: Send + Sync {
    /// Fetch the record for `date`.
    async fn get_picture(
        &self,
        ctx: &FetchContext,
        date: NaiveDate,
    ) -> Result<PictureRecord, FetchError>;
}
