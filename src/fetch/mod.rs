//! Source dataset retrieval
//!
//! This module downloads the two datasets the statistics are built from:
//! - **Client** - Async HTTP downloader writing dated files under `data/`
//! - **Retry** - Exponential backoff and transient-failure classification
//!
//! Both downloads run concurrently; a dataset that still fails after its
//! retry budget aborts the run with [`crate::errors::AppError::SourceUnavailable`].

pub mod client;
pub mod retry;

// Re-export main types
pub use client::{Dataset, DatasetFetcher, DownloadStatus};
pub use retry::{calculate_next_backoff, is_retryable, RetryPolicy};
