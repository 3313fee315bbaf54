use crate::config::types::CrawlConfig;
use crate::ConfigError;
use reqwest::header::HeaderValue;
use std::time::Duration;

const MAX_PARALLELISM: usize = 256;
const MAX_JITTER: Duration = Duration::from_secs(60);

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_concurrency(config)?;
    validate_user_agent(&config.user_agent)?;
    validate_timing(config)?;
    Ok(())
}

/// Validates worker and per-host limits
fn validate_concurrency(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.parallelism < 1 || config.parallelism > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM, config.parallelism
        )));
    }

    if config.max_per_host < 1 {
        return Err(ConfigError::Validation(format!(
            "max_per_host must be >= 1, got {}",
            config.max_per_host
        )));
    }

    Ok(())
}

/// Validates the identifying agent string
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if HeaderValue::from_str(user_agent).is_err() {
        return Err(ConfigError::Validation(format!(
            "user_agent is not a valid header value: '{}'",
            user_agent.escape_debug()
        )));
    }

    Ok(())
}

/// Validates timeouts and jitter
fn validate_timing(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.request_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request_timeout must be > 0".to_string(),
        ));
    }

    if config.connect_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "connect_timeout must be > 0".to_string(),
        ));
    }

    if config.jitter > MAX_JITTER {
        return Err(ConfigError::Validation(format!(
            "jitter must be <= {}ms, got {}ms",
            MAX_JITTER.as_millis(),
            config.jitter.as_millis()
        )));
    }

    Ok(())
}
