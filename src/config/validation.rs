use crate::config::types::{Config, HttpConfig, PortalConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_portal_config(&config.portal)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates portal configuration
fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.first_page < 1 {
        return Err(ConfigError::Validation(
            "first_page must be >= 1, got 0".to_string(),
        ));
    }

    if config.first_page > config.last_page {
        return Err(ConfigError::Validation(format!(
            "first_page ({}) must not exceed last_page ({})",
            config.first_page, config.last_page
        )));
    }

    if config.publish_date_field.trim().is_empty() {
        return Err(ConfigError::Validation(
            "publish_date_field cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(
            "max_attempts must be >= 1, got 0".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1, got 0".to_string(),
        ));
    }

    Ok(())
}
