//! Effective watch settings: `watch.toml` values overlaid with CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use pulse_core::{PollConfig, WatchConfig};

/// Endpoint used when neither a config file nor `--endpoint` names one.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/metrics";

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_points: Option<usize>,
    pub html_out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub poll: PollConfig,
    pub timeout: Duration,
    pub max_points: usize,
    pub html_out: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(file: Option<WatchConfig>, overrides: Overrides) -> anyhow::Result<Self> {
        let base = file.unwrap_or_else(|| WatchConfig::scaffold(DEFAULT_ENDPOINT));

        let endpoint = overrides.endpoint.unwrap_or_else(|| base.endpoint.url.clone());

        let poll = match overrides.interval_secs {
            Some(secs) => PollConfig::new(Duration::from_secs(secs))?,
            None => base.poll_config()?,
        };

        let timeout = match overrides.timeout_secs {
            Some(0) => anyhow::bail!("timeout must be at least 1 second"),
            Some(secs) => Duration::from_secs(secs),
            None => base.timeout()?,
        };

        let max_points = match overrides.max_points {
            Some(n) => {
                anyhow::ensure!(n > 0, "max-points must be at least 1");
                n
            }
            None => base.max_points()?,
        };

        let html_out = overrides
            .html_out
            .or_else(|| base.html_out().map(|p| p.to_path_buf()));

        Ok(Self {
            endpoint,
            poll,
            timeout,
            max_points,
            html_out,
        })
    }
}
