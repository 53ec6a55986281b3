//! Crawl tools backed by the crawl service client

use crate::crawler::{BatchOrchestrator, CrawlClient, FetchRequest};
use crate::targets::UrlRef;
use crate::tools::{optional_str, required_str, Tool};
use crate::{RelayError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Fetches a single page through the crawl service
pub struct CrawlPageTool {
    client: Arc<CrawlClient>,
}

impl CrawlPageTool {
    pub fn new(client: Arc<CrawlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CrawlPageTool {
    fn name(&self) -> &str {
        "playwright_crawl"
    }

    fn description(&self) -> &str {
        "Crawl a single URL with the remote browser service. Returns the service's JSON response or a structured error."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The page to crawl"
                },
                "selector": {
                    "type": "string",
                    "description": "Optional CSS selector limiting what is extracted"
                },
                "add_delays": {
                    "type": "boolean",
                    "description": "Ask the service to pace its browser actions (default: true)",
                    "default": true
                },
                "session_id": {
                    "type": "string",
                    "description": "Browsing session to reuse; generated when omitted"
                },
                "max_retries": {
                    "type": "integer",
                    "description": "Attempts before giving up",
                    "minimum": 1
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let url = required_str(&args, "url")?;

        let request = FetchRequest::new(url)
            .with_selector(optional_str(&args, "selector"))
            .with_add_delays(args.get("add_delays").and_then(Value::as_bool).unwrap_or(true))
            .with_session_id(optional_str(&args, "session_id"));

        let max_retries = args
            .get("max_retries")
            .and_then(Value::as_u64)
            .map(|n| n.min(u64::from(u32::MAX)) as u32)
            .unwrap_or_else(|| self.client.max_retries());

        let outcome = self.client.fetch(&request, max_retries).await;
        Ok(serde_json::to_value(outcome)?)
    }
}

/// Crawls a list of URLs sequentially and reports aggregate statistics
pub struct CrawlBatchTool {
    orchestrator: BatchOrchestrator,
}

impl CrawlBatchTool {
    pub fn new(orchestrator: BatchOrchestrator) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl Tool for CrawlBatchTool {
    fn name(&self) -> &str {
        "crawl_multiple_urls"
    }

    fn description(&self) -> &str {
        "Crawl several URLs one after another with randomized pacing. Accepts URL strings or objects with a 'url' key."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "array",
                    "description": "URLs to crawl, as strings or objects with a 'url' key",
                    "items": {
                        "anyOf": [
                            {"type": "string"},
                            {"type": "object", "properties": {"url": {"type": "string"}}}
                        ]
                    }
                },
                "selector": {
                    "type": "string",
                    "description": "Optional CSS selector applied to every page"
                },
                "delay_between_urls": {
                    "type": "number",
                    "description": "Base delay between URLs in seconds (default: 2.0)",
                    "minimum": 0
                }
            },
            "required": ["urls"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let urls = match args.get("urls") {
            Some(urls @ Value::Array(_)) => serde_json::from_value::<Vec<UrlRef>>(urls.clone())?,
            _ => {
                return Err(RelayError::InvalidInput(
                    "Missing 'urls' array parameter".to_string(),
                ))
            }
        };
        let selector = optional_str(&args, "selector");

        let response = match args.get("delay_between_urls").and_then(Value::as_f64) {
            Some(delay) if delay.is_finite() && delay >= 0.0 => {
                self.orchestrator.run_with_delay(&urls, selector, delay).await
            }
            Some(delay) => {
                return Err(RelayError::InvalidInput(format!(
                    "delay_between_urls must be >= 0, got {}",
                    delay
                )))
            }
            None => self.orchestrator.run(&urls, selector).await,
        };

        Ok(serde_json::to_value(response)?)
    }
}
