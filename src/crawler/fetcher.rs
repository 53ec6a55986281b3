//! HTTP client for the remote crawl service
//!
//! This module handles all requests to the crawl service, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - POSTing one page request to `<base-url>/crawl`
//! - Retrying transient failures with per-class backoff
//! - Converting the final failure into a structured `FetchOutcome`

use crate::config::{CrawlerServiceConfig, UserAgentConfig};
use crate::crawler::outcome::FetchOutcome;
use crate::crawler::pause::{Pause, TokioPause};
use crate::crawler::request::FetchRequest;
use crate::crawler::retry::{decide, AttemptError, RetryDecision};
use crate::RelayError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Anything that can turn a URL into a `FetchOutcome`
///
/// The batch orchestrator drives this trait, so it can run against the real
/// service client or an in-memory stand-in.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str, selector: Option<&str>) -> FetchOutcome;
}

/// Builds an HTTP client for the crawl service
///
/// The per-request timeout comes from the service config. Connecting is
/// bounded separately; reqwest reports a connect timeout as a timeout, so an
/// unreachable host follows the timeout backoff rather than the transport one.
pub fn build_http_client(
    service: &CrawlerServiceConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = service.timeout();

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the remote crawl service
pub struct CrawlClient {
    client: Client,
    endpoint: String,
    max_retries: u32,
    pause: Arc<dyn Pause>,
}

impl CrawlClient {
    /// Creates a client for the service described by `service`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlClient)` - Client ready to issue requests
    /// * `Err(RelayError)` - The HTTP client could not be built
    pub fn new(
        service: &CrawlerServiceConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, RelayError> {
        let client = build_http_client(service, user_agent)?;

        Ok(Self {
            client,
            endpoint: format!("{}/crawl", service.base_url.trim_end_matches('/')),
            max_retries: service.max_retries.max(1),
            pause: Arc::new(TokioPause),
        })
    }

    /// Replaces how backoff delays are waited out
    pub fn with_pause(mut self, pause: Arc<dyn Pause>) -> Self {
        self.pause = pause;
        self
    }

    /// Full URL requests are POSTed to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Attempts per URL used by `fetch_page`
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fetches one page with bounded retries
    ///
    /// Attempts are numbered `1..=max_retries` (a value of 0 is treated as 1).
    /// A 2xx response returns right away; its body counts as a success unless
    /// it reports a non-`"success"` `status` of its own. Timeouts, 5xx and
    /// transport errors are retried after a backoff until the last attempt;
    /// any other status fails immediately. Failures are returned as values,
    /// never as errors.
    pub async fn fetch(&self, request: &FetchRequest, max_retries: u32) -> FetchOutcome {
        if request.url.trim().is_empty() {
            tracing::warn!("[Crawl] Refusing to fetch an empty URL");
            return FetchOutcome::invalid_input(Value::String(request.url.clone()));
        }

        let max_retries = max_retries.max(1);
        let mut attempt = 1;

        loop {
            tracing::info!(
                "[Crawl] Attempt {}/{} -> {}",
                attempt,
                max_retries,
                request.url
            );

            let error = match self.send_once(request).await {
                Ok(data) => return FetchOutcome::from_service_body(&request.url, data),
                Err(error) => error,
            };

            match &error {
                AttemptError::Timeout => {
                    tracing::warn!("[Crawl Timeout] {} (attempt {})", request.url, attempt)
                }
                AttemptError::Status(status) => {
                    tracing::warn!("[Crawl HTTP Error] {} for {}", status, request.url)
                }
                AttemptError::Transport(message) => {
                    tracing::warn!("[Crawl Request Error] {} for {}", message, request.url)
                }
            }

            match decide(&error, attempt, max_retries) {
                RetryDecision::Retry(delay) => {
                    tracing::debug!("Retrying {} in {:?}", request.url, delay);
                    self.pause.pause(delay).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp => return error.into_outcome(&request.url),
            }
        }
    }

    /// Sends a single attempt and reads the JSON body
    async fn send_once(&self, request: &FetchRequest) -> Result<Value, AttemptError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AttemptError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AttemptError::from_reqwest(&e))
    }
}

#[async_trait]
impl PageFetcher for CrawlClient {
    async fn fetch_page(&self, url: &str, selector: Option<&str>) -> FetchOutcome {
        let request = FetchRequest::new(url).with_selector(selector);
        self.fetch(&request, self.max_retries).await
    }
}
