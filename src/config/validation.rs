use crate::config::types::{Config, CrawlerConfig, HttpConfig, StrategyConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_strategy_config(&config.strategies)?;
    Ok(())
}

/// Validates crawl frontier configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.max_urls_per_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max_urls_per_depth must be >= 1, got {}",
            config.max_urls_per_depth
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates strategy escalation configuration
fn validate_strategy_config(config: &StrategyConfig) -> Result<(), ConfigError> {
    if config.min_link_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "min_link_threshold must be >= 1, got {}",
            config.min_link_threshold
        )));
    }

    if config.render_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "render_timeout_secs must be >= 1, got {}",
            config.render_timeout_secs
        )));
    }

    if config.max_clicks_per_group > config.max_total_clicks && config.max_total_clicks > 0 {
        return Err(ConfigError::Validation(format!(
            "max_clicks_per_group ({}) cannot exceed max_total_clicks ({})",
            config.max_clicks_per_group, config.max_total_clicks
        )));
    }

    Ok(())
}
