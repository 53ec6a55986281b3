//! Sequential multi-URL crawling with pacing
//!
//! URLs are fetched strictly one at a time, in input order. Between two
//! requests the orchestrator waits `delay ± jitter` seconds so the crawl
//! service never sees a fixed request cadence.

use crate::config::BatchConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::outcome::FetchOutcome;
use crate::crawler::pause::{Pause, TokioPause};
use crate::targets::UrlRef;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Message returned when a batch has nothing to crawl
pub const EMPTY_BATCH_ERROR: &str = "No URLs provided";

/// Aggregate result of a completed batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub total_urls: usize,
    pub successful: usize,
    pub failed: usize,
    pub elapsed_seconds: f64,
    pub started_at: DateTime<Utc>,
    /// One outcome per input element, in input order
    pub results: Vec<FetchOutcome>,
}

/// What a batch call returns: a report, or a top-level error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchResponse {
    Completed(BatchReport),
    Error { error: String },
}

impl BatchResponse {
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Error { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<BatchReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Error { .. } => None,
        }
    }
}

/// Delay inserted between consecutive URLs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// Base delay (seconds)
    pub delay_between: f64,
    /// Half-width of the uniform jitter (seconds)
    pub jitter: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            delay_between: 2.0,
            jitter: 0.5,
        }
    }
}

impl From<&BatchConfig> for Pacing {
    fn from(config: &BatchConfig) -> Self {
        Self {
            delay_between: config.delay_between_urls,
            jitter: config.pacing_jitter,
        }
    }
}

impl Pacing {
    pub fn with_delay(self, delay_between: f64) -> Self {
        Self {
            delay_between,
            ..self
        }
    }

    /// Draws the next delay from `delay_between ± jitter`, floored at zero
    pub fn next_delay(&self) -> Duration {
        let jitter = self.jitter.abs();
        let offset = if jitter > 0.0 {
            rand::thread_rng().gen_range(-jitter..=jitter)
        } else {
            0.0
        };

        let secs = self.delay_between + offset;
        if secs.is_finite() && secs > 0.0 {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO
        }
    }
}

/// Crawls `urls` one by one and aggregates the outcomes
///
/// # Behavior
///
/// 1. Empty input returns `BatchResponse::Error` without any network activity
/// 2. Each element is resolved with [`UrlRef::resolve`]; an element without a
///    usable URL records an `invalid_input` failure and is not fetched
/// 3. Resolved URLs go through `fetcher` with the shared `selector`
/// 4. After every fetched URL except the last element, waits `pacing.next_delay()`
///
/// A failing URL never stops the batch.
pub async fn fetch_batch(
    fetcher: &dyn PageFetcher,
    pause: &dyn Pause,
    urls: &[UrlRef],
    selector: Option<&str>,
    pacing: Pacing,
) -> BatchResponse {
    if urls.is_empty() {
        tracing::warn!("[Batch] {}", EMPTY_BATCH_ERROR);
        return BatchResponse::Error {
            error: EMPTY_BATCH_ERROR.to_string(),
        };
    }

    let total = urls.len();
    let started_at = Utc::now();
    let start = Instant::now();

    let mut results = Vec::with_capacity(total);
    let mut successful = 0;
    let mut failed = 0;

    for (idx, target) in urls.iter().enumerate().map(|(i, t)| (i + 1, t)) {
        let Some(url) = target.resolve() else {
            tracing::warn!("[Batch] {}/{}: element has no usable URL", idx, total);
            results.push(FetchOutcome::invalid_input(target.to_value()));
            failed += 1;
            continue;
        };

        tracing::info!("[Batch] {}/{} -> {}", idx, total, url);
        let outcome = fetcher.fetch_page(url, selector).await;

        if outcome.is_success() {
            successful += 1;
        } else {
            failed += 1;
        }
        results.push(outcome);

        if idx < total {
            let delay = pacing.next_delay();
            tracing::debug!("[Batch] Pacing {:?} before next URL", delay);
            pause.pause(delay).await;
        }
    }

    let elapsed_seconds = start.elapsed().as_secs_f64();
    tracing::info!(
        "[Batch] Completed: {} succeeded, {} failed in {:.2}s",
        successful,
        failed,
        elapsed_seconds
    );

    BatchResponse::Completed(BatchReport {
        total_urls: total,
        successful,
        failed,
        elapsed_seconds,
        started_at,
        results,
    })
}

/// Owns a fetcher, a pause strategy and pacing defaults for repeated batches
#[derive(Clone)]
pub struct BatchOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    pause: Arc<dyn Pause>,
    pacing: Pacing,
}

impl BatchOrchestrator {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            pause: Arc::new(TokioPause),
            pacing: Pacing::default(),
        }
    }

    pub fn with_pause(mut self, pause: Arc<dyn Pause>) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Runs a batch with the configured pacing
    pub async fn run(&self, urls: &[UrlRef], selector: Option<&str>) -> BatchResponse {
        fetch_batch(
            self.fetcher.as_ref(),
            self.pause.as_ref(),
            urls,
            selector,
            self.pacing,
        )
        .await
    }

    /// Runs a batch with a one-off base delay
    pub async fn run_with_delay(
        &self,
        urls: &[UrlRef],
        selector: Option<&str>,
        delay_between: f64,
    ) -> BatchResponse {
        fetch_batch(
            self.fetcher.as_ref(),
            self.pause.as_ref(),
            urls,
            selector,
            self.pacing.with_delay(delay_between),
        )
        .await
    }
}
