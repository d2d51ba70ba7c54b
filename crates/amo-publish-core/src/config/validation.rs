//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_api(config)?;
    validate_polling(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_api(config: &Config) -> Result<()> {
    let url = url::Url::parse(&config.api.base_url).map_err(|e| ConfigError::InvalidValue {
        field: "api.base_url".to_string(),
        message: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into());
    }

    if config.api.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "api.request_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_polling(config: &Config) -> Result<()> {
    if config.polling.interval_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "polling.interval_secs".to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }

    if config.polling.timeout_secs < config.polling.interval_secs {
        return Err(ConfigError::InvalidValue {
            field: "polling.timeout_secs".to_string(),
            message: "must not be shorter than polling.interval_secs".to_string(),
        }
        .into());
    }

    Ok(())
}
