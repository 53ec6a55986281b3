//! Retry policy for crawl service requests
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Timeout | Retry, `min(5 * attempt, 30)`s backoff |
//! | HTTP 5xx | Retry, `min(5 * attempt, 30)`s backoff |
//! | HTTP 4xx (and other non-2xx) | Give up immediately |
//! | Transport error | Retry, `1 + attempt`s backoff |
//!
//! Every retryable condition gives up once the last attempt has failed.

use crate::crawler::outcome::FetchOutcome;
use std::time::Duration;

/// Upper bound on the timeout/5xx backoff (seconds)
pub const MAX_SERVER_BACKOFF_SECS: u64 = 30;

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    Timeout,
    Status(u16),
    Transport(String),
}

impl AttemptError {
    /// Classifies a reqwest error raised while sending or reading a response
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error.to_string())
        }
    }

    /// Converts the final failed attempt into a structured outcome
    pub fn into_outcome(self, url: &str) -> FetchOutcome {
        match self {
            Self::Timeout => FetchOutcome::timeout(url),
            Self::Status(status) => FetchOutcome::http_status(url, status),
            Self::Transport(message) => FetchOutcome::transport(url, message),
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then try again
    Retry(Duration),
    /// Stop and report the failure
    GiveUp,
}

/// Backoff after a timeout or 5xx on `attempt` (1-based)
pub fn server_backoff(attempt: u32) -> Duration {
    let secs = u64::from(attempt).saturating_mul(5);
    Duration::from_secs(secs.min(MAX_SERVER_BACKOFF_SECS))
}

/// Backoff after a transport error on `attempt` (1-based)
pub fn transport_backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 + u64::from(attempt))
}

/// Decides whether `attempt` of `max_attempts` should be retried
pub fn decide(error: &AttemptError, attempt: u32, max_attempts: u32) -> RetryDecision {
    let is_last = attempt >= max_attempts;

    match error {
        AttemptError::Status(status) if *status < 500 => RetryDecision::GiveUp,
        _ if is_last => RetryDecision::GiveUp,
        AttemptError::Timeout | AttemptError::Status(_) => {
            RetryDecision::Retry(server_backoff(attempt))
        }
        AttemptError::Transport(_) => RetryDecision::Retry(transport_backoff(attempt)),
    }
}
