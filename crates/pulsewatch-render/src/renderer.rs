//! Renderer — folds poll outcomes into the display.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use tracing::debug;

use pulse_core::{ConfigError, MetricsSnapshot, PollError};

use crate::chart::{ChartFrame, RedrawMode};
use crate::error::RenderError;
use crate::history::{HistoryPoint, RollingHistory};
use crate::sink::{DisplaySink, Field};
use crate::status::StatusIndicator;

/// Format a percentage with two decimals and a `%` suffix.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Format a load average with two decimals.
pub fn format_load(value: f64) -> String {
    format!("{value:.2}")
}

/// Local time of day as `HH:MM:SS`.
pub fn time_label(at: SystemTime) -> String {
    DateTime::<Local>::from(at).format("%H:%M:%S").to_string()
}

/// Owns the rolling history and status indicator for one display.
///
/// Not thread-safe by design: it is driven from a single dispatch loop.
pub struct Renderer<S: DisplaySink> {
    sink: S,
    history: RollingHistory,
    status: StatusIndicator,
    labeler: fn(SystemTime) -> String,
    drawn: bool,
}

impl<S: DisplaySink> Renderer<S> {
    pub fn new(sink: S, max_points: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            sink,
            history: RollingHistory::new(max_points)?,
            status: StatusIndicator::Uninitialized,
            labeler: time_label,
            drawn: false,
        })
    }

    /// Override how receipt times become x-axis labels.
    pub fn with_labeler(mut self, labeler: fn(SystemTime) -> String) -> Self {
        self.labeler = labeler;
        self
    }

    /// Show a freshly received snapshot.
    pub fn on_snapshot(&mut self, snapshot: &MetricsSnapshot) -> Result<(), RenderError> {
        self.status = StatusIndicator::from_snapshot(snapshot);
        self.history.push(HistoryPoint {
            label: (self.labeler)(snapshot.received_at),
            cpu: snapshot.cpu_usage,
            memory: snapshot.memory_usage,
            load: snapshot.load_avg,
        });

        self.sink.set_text(Field::Cpu, &format_percent(snapshot.cpu_usage));
        self.sink.set_text(Field::Memory, &format_percent(snapshot.memory_usage));
        self.sink.set_text(Field::Load, &format_load(snapshot.load_avg));
        self.sink.set_status(self.status.message(), self.status.class());

        let mode = if self.drawn {
            RedrawMode::Immediate
        } else {
            RedrawMode::Animated
        };
        self.sink.draw_chart(&ChartFrame::from_history(&self.history), mode);
        self.drawn = true;

        debug!(
            status = self.status.name(),
            points = self.history.len(),
            "rendered metrics snapshot"
        );
        self.sink.present()
    }

    /// Show a poll failure. Metric text and chart history are left as they were.
    pub fn on_error(&mut self, err: &PollError) -> Result<(), RenderError> {
        self.status = StatusIndicator::from_error(err);
        self.sink.set_status(self.status.message(), self.status.class());
        self.sink.present()
    }

    /// Fold one poll outcome into the display.
    pub fn apply(&mut self, outcome: &Result<MetricsSnapshot, PollError>) -> Result<(), RenderError> {
        match outcome {
            Ok(snapshot) => self.on_snapshot(snapshot),
            Err(err) => self.on_error(err),
        }
    }

    /// Tell the sink the poll interval changed.
    pub fn on_interval_changed(&mut self, interval: Duration) {
        self.sink.interval_changed(interval);
    }

    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    pub fn history(&self) -> &RollingHistory {
        &self.history
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn fixed_label(_: SystemTime) -> String {
        "12:00:00".to_string()
    }

    fn renderer(max_points: usize) -> Renderer<MemorySink> {
        Renderer::new(MemorySink::new(), max_points)
            .unwrap()
            .with_labeler(fixed_label)
    }

    fn snap(cpu: f64, memory: f64, load: f64, anomaly: bool) -> MetricsSnapshot {
        MetricsSnapshot::new(cpu, memory, load, anomaly)
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_percent(12.3), "12.30%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(99.999), "100.00%");
        assert_eq!(format_load(0.75), "0.75");
        assert_eq!(format_load(3.14159), "3.14");
    }

    #[test]
    fn renders_example_snapshot() {
        let mut r = renderer(30);
        r.on_snapshot(&snap(12.3, 45.6, 0.75, false)).unwrap();

        let sink = r.sink();
        assert_eq!(sink.text(Field::Cpu), Some("12.30%"));
        assert_eq!(sink.text(Field::Memory), Some("45.60%"));
        assert_eq!(sink.text(Field::Load), Some("0.75"));
        assert_eq!(sink.status_class(), Some("status safe"));
        assert_eq!(r.status(), &StatusIndicator::Safe);
        assert_eq!(r.history().len(), 1);
        assert_eq!(sink.last_frame().unwrap().labels, vec!["12:00:00"]);
    }

    #[test]
    fn anomaly_tracks_latest_snapshot() {
        let mut r = renderer(30);
        r.on_snapshot(&snap(95.0, 90.0, 6.0, true)).unwrap();
        assert_eq!(r.status(), &StatusIndicator::Anomaly);
        assert_eq!(r.sink().status_class(), Some("status alert"));

        r.on_snapshot(&snap(10.0, 30.0, 0.2, false)).unwrap();
        assert_eq!(r.status(), &StatusIndicator::Safe);
    }

    #[test]
    fn error_keeps_last_good_display() {
        let mut r = renderer(30);
        r.on_snapshot(&snap(12.3, 45.6, 0.75, true)).unwrap();
        let frames_before = r.sink().frames().len();

        r.on_error(&PollError::Transport(
            "Network response was not ok: Service Unavailable (status: 503)".into(),
        ))
        .unwrap();

        let sink = r.sink();
        assert_eq!(r.status().name(), "error");
        assert_eq!(sink.status_class(), Some("status error"));
        assert!(sink.status_text().unwrap().contains("503"));
        assert_eq!(sink.text(Field::Cpu), Some("12.30%"));
        assert_eq!(sink.text(Field::Memory), Some("45.60%"));
        assert_eq!(sink.text(Field::Load), Some("0.75"));
        assert_eq!(r.history().len(), 1);
        assert_eq!(sink.frames().len(), frames_before);
    }

    #[test]
    fn server_reported_error_surfaces_message() {
        let mut r = renderer(30);
        r.on_error(&PollError::ServerReported("sensor offline".into()))
            .unwrap();
        assert!(r.sink().status_text().unwrap().contains("sensor offline"));
        assert!(r.history().is_empty());
        assert!(r.sink().text(Field::Cpu).is_none());
    }

    #[test]
    fn recovers_from_error_on_next_snapshot() {
        let mut r = renderer(30);
        r.on_error(&PollError::MalformedResponse("bad".into())).unwrap();
        r.on_snapshot(&snap(1.0, 2.0, 0.0, false)).unwrap();
        assert_eq!(r.status(), &StatusIndicator::Safe);
    }

    #[test]
    fn history_is_bounded_and_fifo() {
        let max_points = 20;
        let mut r = renderer(max_points);
        for i in 0..max_points + 5 {
            r.on_snapshot(&snap(i as f64, 0.0, 0.0, false)).unwrap();
            assert!(r.history().len() <= max_points);
        }
        let frame = r.sink().last_frame().unwrap();
        assert_eq!(frame.len(), max_points);
        assert_eq!(frame.series[0].values.first(), Some(&5.0));
        assert_eq!(frame.series[0].values.last(), Some(&24.0));
    }

    #[test]
    fn only_first_draw_animates() {
        let mut r = renderer(5);
        for _ in 0..3 {
            r.on_snapshot(&snap(1.0, 1.0, 1.0, false)).unwrap();
        }
        let modes: Vec<RedrawMode> = r.sink().frames().iter().map(|(_, m)| *m).collect();
        assert_eq!(
            modes,
            vec![RedrawMode::Animated, RedrawMode::Immediate, RedrawMode::Immediate]
        );
    }

    #[test]
    fn every_outcome_presents_once() {
        let mut r = renderer(5);
        r.apply(&Ok(snap(1.0, 1.0, 1.0, false))).unwrap();
        r.apply(&Err(PollError::Transport("down".into()))).unwrap();
        assert_eq!(r.sink().presents(), 2);
    }

    #[test]
    fn interval_change_reaches_sink() {
        let mut r = renderer(5);
        r.on_interval_changed(Duration::from_secs(10));
        assert_eq!(r.sink().interval(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn zero_max_points_is_rejected() {
        assert!(Renderer::new(MemorySink::new(), 0).is_err());
    }
}
