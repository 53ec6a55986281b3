//! Crawler module for talking to the remote crawl service
//!
//! This module contains the core request logic, including:
//! - Request construction and session ids
//! - HTTP fetching with retry logic and error classification
//! - Sequential batch crawling with pacing jitter
//! - Result aggregation

mod batch;
mod fetcher;
mod outcome;
mod pause;
mod request;
pub mod retry;

pub use batch::{
    fetch_batch, BatchOrchestrator, BatchReport, BatchResponse, Pacing, EMPTY_BATCH_ERROR,
};
pub use fetcher::{build_http_client, CrawlClient, PageFetcher};
pub use outcome::{FailureKind, FetchOutcome};
pub use pause::{Pause, RecordingPause, TokioPause};
pub use request::{generate_session_id, FetchRequest};

use crate::config::Config;
use crate::targets::UrlRef;
use crate::RelayError;
use std::sync::Arc;

/// Crawls `urls` against the service described by `config`
///
/// Convenience entry point that wires a [`CrawlClient`] into a
/// [`BatchOrchestrator`] using the configured pacing.
///
/// # Example
///
/// ```no_run
/// use crawl_relay::config::load_config;
/// use crawl_relay::crawler::crawl_urls;
/// use crawl_relay::UrlRef;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("relay.toml"))?;
/// let urls = vec![UrlRef::from("https://example.com/")];
/// let response = crawl_urls(&config, &urls, None).await?;
/// println!("{}", serde_json::to_string_pretty(&response)?);
/// # Ok(())
/// # }
/// ```
pub async fn crawl_urls(
    config: &Config,
    urls: &[UrlRef],
    selector: Option<&str>,
) -> Result<BatchResponse, RelayError> {
    let client = CrawlClient::new(&config.crawler_service, &config.user_agent)?;
    let orchestrator =
        BatchOrchestrator::new(Arc::new(client)).with_pacing(Pacing::from(&config.batch));
    Ok(orchestrator.run(urls, selector).await)
}
