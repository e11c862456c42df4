use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PollError};

/// Default poll interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Default number of samples kept in the rolling history.
pub const DEFAULT_MAX_POINTS: usize = 30;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// One polled measurement of system metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// CPU usage percentage (0–100).
    pub cpu_usage: f64,
    /// Memory usage percentage (0–100).
    pub memory_usage: f64,
    /// One-minute load average.
    pub load_avg: f64,
    /// Whether the server-side detector flagged this sample.
    pub anomaly_detected: bool,
    /// Receipt time, stamped by the client.
    #[serde(skip, default = "SystemTime::now")]
    pub received_at: SystemTime,
}

/// Wire shape of a `/metrics` response body.
///
/// Every field is optional so an error-only body such as
/// `{"error": "sensor offline"}` still decodes and can be reported as a
/// server error rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
struct MetricsPayload {
    cpu_usage: Option<f64>,
    memory_usage: Option<f64>,
    load_avg: Option<f64>,
    anomaly_detected: Option<bool>,
    error: Option<String>,
}

impl MetricsSnapshot {
    /// Build a snapshot stamped with the current time.
    pub fn new(cpu_usage: f64, memory_usage: f64, load_avg: f64, anomaly_detected: bool) -> Self {
        Self {
            cpu_usage,
            memory_usage,
            load_avg,
            anomaly_detected,
            received_at: SystemTime::now(),
        }
    }

    /// Decode a `/metrics` response body.
    ///
    /// A non-empty `error` field wins over any metric values present.
    pub fn from_json(body: &[u8]) -> Result<Self, PollError> {
        let payload: MetricsPayload = serde_json::from_slice(body)
            .map_err(|e| PollError::MalformedResponse(e.to_string()))?;

        if let Some(message) = payload.error.filter(|m| !m.is_empty()) {
            return Err(PollError::ServerReported(message));
        }

        let cpu_usage = require(payload.cpu_usage, "cpu_usage")?;
        let memory_usage = require(payload.memory_usage, "memory_usage")?;
        let load_avg = require(payload.load_avg, "load_avg")?;
        let anomaly_detected = payload
            .anomaly_detected
            .ok_or_else(|| missing("anomaly_detected"))?;

        Ok(Self::new(cpu_usage, memory_usage, load_avg, anomaly_detected))
    }
}

fn require(value: Option<f64>, field: &str) -> Result<f64, PollError> {
    let value = value.ok_or_else(|| missing(field))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PollError::MalformedResponse(format!("{field} is not a finite number")))
    }
}

fn missing(field: &str) -> PollError {
    PollError::MalformedResponse(format!("missing field `{field}`"))
}

/// Poll timer configuration. The interval is always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    interval: Duration,
}

impl PollConfig {
    pub fn new(interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidInterval("0".to_string()));
        }
        Ok(Self { interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
        }
    }
}
