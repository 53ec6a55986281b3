use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Crawl-Relay
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "crawler-service")]
    pub crawler_service: CrawlerServiceConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub mail: Option<MailConfig>,
}

/// Remote crawl service endpoint and retry policy
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerServiceConfig {
    /// Base URL of the crawl service; requests go to `<base-url>/crawl`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Per-attempt request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts made per URL before giving up
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,
}

impl CrawlerServiceConfig {
    /// Creates a service config with default timeout and retries
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pacing between URLs of a batch
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Base delay between consecutive URLs (seconds)
    #[serde(rename = "delay-between-urls", default = "default_delay_between_urls")]
    pub delay_between_urls: f64,

    /// Half-width of the uniform jitter added to the delay (seconds)
    #[serde(rename = "pacing-jitter", default = "default_pacing_jitter")]
    pub pacing_jitter: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay_between_urls: default_delay_between_urls(),
            pacing_jitter: default_pacing_jitter(),
        }
    }
}

/// User agent identification sent to the crawl service
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "client-name")]
    pub client_name: String,

    #[serde(rename = "client-version")]
    pub client_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: env!("CARGO_PKG_NAME").to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Format: ClientName/Version
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.client_name, self.client_version)
    }
}

/// Mailbox API settings
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    #[serde(rename = "api-base", default = "default_mail_api_base")]
    pub api_base: String,

    /// Mailbox owner; `me` addresses the authenticated account
    #[serde(rename = "user-id", default = "default_me")]
    pub user_id: String,

    #[serde(default = "default_me")]
    pub from: String,

    /// Environment variable holding the OAuth access token
    #[serde(rename = "access-token-env", default = "default_access_token_env")]
    pub access_token_env: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_base: default_mail_api_base(),
            user_id: default_me(),
            from: default_me(),
            access_token_env: default_access_token_env(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    3
}

fn default_delay_between_urls() -> f64 {
    2.0
}

fn default_pacing_jitter() -> f64 {
    0.5
}

fn default_mail_api_base() -> String {
    "https://gmail.googleapis.com".to_string()
}

fn default_me() -> String {
    "me".to_string()
}

fn default_access_token_env() -> String {
    "GMAIL_ACCESS_TOKEN".to_string()
}
