//! Status indicator state machine.
//!
//! ```text
//!                 ┌── snapshot, no anomaly ──▶ Safe
//! Uninitialized ──┼── snapshot, anomaly ─────▶ Anomaly
//!                 └── poll error ────────────▶ Error
//! ```
//!
//! Every state moves to `Safe`, `Anomaly`, or `Error` on the next completed
//! fetch. Only `Uninitialized` cannot be re-entered.

use pulse_core::{MetricsSnapshot, PollError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusIndicator {
    #[default]
    Uninitialized,
    Safe,
    Anomaly,
    /// Carries the display message.
    Error(String),
}

impl StatusIndicator {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        if snapshot.anomaly_detected {
            StatusIndicator::Anomaly
        } else {
            StatusIndicator::Safe
        }
    }

    pub fn from_error(err: &PollError) -> Self {
        StatusIndicator::Error(format!("Error: Failed to fetch or process metrics: {err}"))
    }

    /// State name.
    pub fn name(&self) -> &'static str {
        match self {
            StatusIndicator::Uninitialized => "uninitialized",
            StatusIndicator::Safe => "safe",
            StatusIndicator::Anomaly => "anomaly",
            StatusIndicator::Error(_) => "error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            StatusIndicator::Uninitialized => "Waiting for metrics...",
            StatusIndicator::Safe => "System is running smoothly.",
            StatusIndicator::Anomaly => "Anomaly Detected! Please check the system immediately!",
            StatusIndicator::Error(message) => message,
        }
    }

    /// CSS class list for the status element.
    pub fn class(&self) -> &'static str {
        match self {
            StatusIndicator::Uninitialized => "status",
            StatusIndicator::Safe => "status safe",
            StatusIndicator::Anomaly => "status alert",
            StatusIndicator::Error(_) => "status error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        let status = StatusIndicator::default();
        assert_eq!(status.name(), "uninitialized");
        assert_eq!(status.class(), "status");
    }

    #[test]
    fn snapshot_picks_safe_or_anomaly() {
        let calm = MetricsSnapshot::new(10.0, 10.0, 0.1, false);
        let hot = MetricsSnapshot::new(99.0, 95.0, 8.0, true);
        assert_eq!(StatusIndicator::from_snapshot(&calm), StatusIndicator::Safe);
        assert_eq!(StatusIndicator::from_snapshot(&hot), StatusIndicator::Anomaly);
        assert_eq!(StatusIndicator::Anomaly.class(), "status alert");
        assert_eq!(StatusIndicator::Safe.class(), "status safe");
    }

    #[test]
    fn error_message_carries_cause() {
        let status =
            StatusIndicator::from_error(&PollError::ServerReported("sensor offline".into()));
        assert_eq!(status.name(), "error");
        assert_eq!(status.class(), "status error");
        assert_eq!(
            status.message(),
            "Error: Failed to fetch or process metrics: Server error: sensor offline"
        );
    }
}
