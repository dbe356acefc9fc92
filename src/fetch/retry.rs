//! Retry policy for dataset downloads
//!
//! Exponential backoff with a cap, plus the classification of which fetch
//! failures are worth another attempt.

use crate::config::SourcesConfig;
use crate::errors::FetchError;
use std::time::Duration;

/// Calculate next backoff duration using exponential backoff with a maximum cap
///
/// `new_backoff = min(current_backoff * multiplier, max_backoff)`
///
/// # Example
/// ```
/// use std::time::Duration;
/// use tls_stats::fetch::calculate_next_backoff;
///
/// let backoff = Duration::from_millis(500);
/// let next = calculate_next_backoff(backoff, 2.0, 30);
/// assert_eq!(next, Duration::from_secs(1));
/// ```
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    Duration::from_millis((current_backoff.as_millis() as f64 * multiplier) as u64)
        .min(Duration::from_secs(max_backoff_seconds))
}

/// Whether a failed attempt should be retried
///
/// Connection failures, timeouts and server-side (5xx) or throttling (429)
/// responses are transient. Any other status is final.
pub fn is_retryable(error: &FetchError) -> bool {
    match error {
        FetchError::ConnectionFailed(_) | FetchError::Timeout { .. } => true,
        FetchError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
        FetchError::MaxRetriesExceeded { .. } | FetchError::AlreadyExists { .. } => false,
    }
}

/// Attempt budget and backoff schedule for one download
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl RetryPolicy {
    pub fn from_sources(sources: &SourcesConfig) -> Self {
        Self {
            max_attempts: sources.max_retries.max(1),
            initial_backoff: Duration::from_millis(sources.initial_backoff_ms),
            multiplier: sources.backoff_multiplier,
            max_backoff_seconds: sources.max_backoff_seconds,
        }
    }

    /// Sleep durations between consecutive attempts
    pub fn delays(&self) -> Vec<Duration> {
        let mut delays = Vec::with_capacity(self.max_attempts.saturating_sub(1));
        let mut backoff = self.initial_backoff;
        for _ in 1..self.max_attempts {
            delays.push(backoff);
            backoff = calculate_next_backoff(backoff, self.multiplier, self.max_backoff_seconds);
        }
        delays
    }
}
