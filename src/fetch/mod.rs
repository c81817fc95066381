//! Picture fetching -- cancellable context and bounded-concurrency orchestration.
//!
//! Split into focused submodules:
//! - [`context`] - Shared cancellation signal, HTTP client, provider trait
//! - [`orchestration`] - Semaphore-gated, fail-fast fan-out over a date list

mod context;
mod orchestration;


pub use context::{FetchContext, PictureProvider};
pub use orchestration::{
    DEFAULT_REQUEST_TIMEOUT, FetchOrchestrator, fetch_all, fetch_all_in_context,
};
