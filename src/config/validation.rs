use crate::config::types::{BatchConfig, Config, CrawlerServiceConfig, MailConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_service(&config.crawler_service)?;
    validate_batch_config(&config.batch)?;
    validate_user_agent_config(&config.user_agent)?;
    if let Some(mail) = &config.mail {
        validate_mail_config(mail)?;
    }
    Ok(())
}

/// Validates the crawl service endpoint and retry policy
fn validate_crawler_service(config: &CrawlerServiceConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_retries < 1 || config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be between 1 and 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if !config.delay_between_urls.is_finite() || config.delay_between_urls < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay-between-urls must be >= 0, got {}",
            config.delay_between_urls
        )));
    }

    if !config.pacing_jitter.is_finite() || config.pacing_jitter < 0.0 {
        return Err(ConfigError::Validation(format!(
            "pacing-jitter must be >= 0, got {}",
            config.pacing_jitter
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate client name: non-empty, alphanumeric + hyphens only
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client-name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    Ok(())
}

fn validate_mail_config(config: &MailConfig) -> Result<(), ConfigError> {
    validate_http_url("api-base", &config.api_base)?;

    if config.user_id.is_empty() {
        return Err(ConfigError::Validation("user-id cannot be empty".to_string()));
    }

    if config.access_token_env.is_empty() {
        return Err(ConfigError::Validation(
            "access-token-env cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Requires an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

/// Basic email validation: one `@`, text on both sides, dotted domain
pub(crate) fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = (parts[0], parts[1]);
    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}
