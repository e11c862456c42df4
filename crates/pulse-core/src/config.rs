//! watch.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::duration::parse_duration;
use crate::error::ConfigError;
use crate::types::{DEFAULT_INTERVAL, DEFAULT_MAX_POINTS, DEFAULT_TIMEOUT, PollConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub endpoint: EndpointConfig,
    pub poll: Option<PollSection>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSection {
    pub interval: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub max_points: Option<usize>,
    pub html_out: Option<PathBuf>,
}

impl WatchConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WatchConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a config pointing at the given endpoint.
    pub fn scaffold(url: &str) -> Self {
        WatchConfig {
            endpoint: EndpointConfig {
                url: url.to_string(),
                timeout: Some("2s".to_string()),
            },
            poll: Some(PollSection {
                interval: Some("5s".to_string()),
            }),
            display: Some(DisplayConfig {
                max_points: Some(DEFAULT_MAX_POINTS),
                html_out: None,
            }),
        }
    }

    /// Resolved poll timer configuration.
    pub fn poll_config(&self) -> Result<PollConfig, ConfigError> {
        let interval = match self.poll.as_ref().and_then(|p| p.interval.as_deref()) {
            Some(raw) => parse_duration(raw)
                .ok_or_else(|| ConfigError::InvalidDuration(raw.to_string()))?,
            None => DEFAULT_INTERVAL,
        };
        PollConfig::new(interval)
    }

    /// Resolved per-request timeout.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        match self.endpoint.timeout.as_deref() {
            Some(raw) => match parse_duration(raw) {
                Some(d) if !d.is_zero() => Ok(d),
                _ => Err(ConfigError::InvalidDuration(raw.to_string())),
            },
            None => Ok(DEFAULT_TIMEOUT),
        }
    }

    /// Resolved rolling-history capacity.
    pub fn max_points(&self) -> Result<usize, ConfigError> {
        match self.display.as_ref().and_then(|d| d.max_points) {
            Some(0) => Err(ConfigError::ZeroCapacity),
            Some(n) => Ok(n),
            None => Ok(DEFAULT_MAX_POINTS),
        }
    }

    pub fn html_out(&self) -> Option<&Path> {
        self.display.as_ref().and_then(|d| d.html_out.as_deref())
    }
}
