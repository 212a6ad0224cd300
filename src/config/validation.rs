use crate::config::types::{CacheConfig, Config, OutputConfig, RetryConfig, ScraperConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;
    validate_names("categories", &config.categories)?;
    validate_names("locations", &config.locations)?;
    validate_scraper_config(&config.scraper)?;
    validate_cache_config(&config.cache)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the base URL: must parse and use an HTTP(S) scheme
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            base_url
        )));
    }

    Ok(())
}

/// Rejects blank entries in the category and location lists
fn validate_names(field: &str, names: &[String]) -> Result<(), ConfigError> {
    if let Some(pos) = names.iter().position(|n| n.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{} entry {} cannot be empty",
            field, pos
        )));
    }
    Ok(())
}

fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.concurrency_limit < 1 || config.concurrency_limit > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency-limit must be between 1 and 100, got {}",
            config.concurrency_limit
        )));
    }

    if config.test_mode && config.test_amount < 1 {
        return Err(ConfigError::Validation(
            "test-amount must be >= 1 when test-mode is enabled".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.dir.is_empty() {
        return Err(ConfigError::Validation(
            "cache dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.retry_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "retry-limit must be >= 1, got {}",
            config.retry_limit
        )));
    }

    if !config.backoff_factor.is_finite() || config.backoff_factor < 0.0 {
        return Err(ConfigError::Validation(format!(
            "backoff-factor must be a finite number >= 0, got {}",
            config.backoff_factor
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.file.is_empty() {
        return Err(ConfigError::Validation(
            "output file cannot be empty".to_string(),
        ));
    }

    if config.image_dir.is_empty() {
        return Err(ConfigError::Validation(
            "image-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
