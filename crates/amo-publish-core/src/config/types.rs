//! Configuration types

use amo_publish_store::amo::{AmoConfig, DEFAULT_API_BASE_URL};
use amo_publish_store::PollSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration for amo-publish
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API connection settings
    pub api: ApiConfig,

    /// Validation polling settings
    pub polling: PollingConfig,
}

/// API connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root (e.g. "https://addons.mozilla.org/api/v5")
    pub base_url: String,

    /// Timeout for a single request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 600,
        }
    }
}

impl ApiConfig {
    /// Client configuration for [`amo_publish_store::amo::AmoClient`]
    pub fn client_config(&self) -> AmoConfig {
        AmoConfig {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Validation polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Wait between status checks, in seconds
    pub interval_secs: u64,

    /// Give up after this many seconds of polling
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        let settings = PollSettings::default();
        Self {
            interval_secs: settings.interval.as_secs(),
            timeout_secs: settings.timeout.as_secs(),
        }
    }
}

impl PollingConfig {
    /// Polling cadence for the upload engine
    pub fn settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
