//! Configuration module for Crawl-Relay
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use crawl_relay::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("relay.toml")).unwrap();
//! println!("Crawl service: {}", config.crawler_service.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BatchConfig, Config, CrawlerServiceConfig, MailConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub(crate) use validation::is_valid_email;
