//! Crawl-Relay: a resilient client for a remote page-crawling service
//!
//! This crate drives a remote browser-automation crawl service over HTTP with
//! bounded retries, paces multi-URL batches, and exposes the results (plus an
//! email delivery helper) as JSON tools for an agent runtime.

pub mod config;
pub mod crawler;
pub mod mail;
pub mod output;
pub mod targets;
pub mod tools;

use thiserror::Error;

/// Main error type for Crawl-Relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail error: {0}")]
    Mail(#[from] mail::MailError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Crawl-Relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    fetch_batch, BatchOrchestrator, BatchReport, BatchResponse, CrawlClient, FailureKind,
    FetchOutcome, FetchRequest, PageFetcher,
};
pub use targets::{parse_target_list, UrlRef};
