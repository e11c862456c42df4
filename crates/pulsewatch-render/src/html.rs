//! HTML page sink.
//!
//! Renders `dashboard.html` with the three metric fields, the status
//! element, and an inline SVG line chart, then swaps the file into place.
//! The page reloads itself once per poll interval.

use std::path::{Path, PathBuf};
use std::time::Duration;

use askama::Template;
use tracing::debug;

use pulse_core::DEFAULT_INTERVAL;

use crate::chart::{ChartFrame, RedrawMode};
use crate::error::RenderError;
use crate::sink::{DisplaySink, Field};
use crate::status::StatusIndicator;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 260.0;
const PAD_LEFT: f64 = 48.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_Y: f64 = 24.0;

// ── View types ──────────────────────────────────────────────────

pub struct MetricField {
    pub id: &'static str,
    pub label: &'static str,
    pub text: String,
}

pub struct SeriesLine {
    pub name: &'static str,
    pub color: &'static str,
    /// SVG `points` attribute.
    pub points: String,
}

pub struct AxisTick {
    pub x: String,
    pub y: String,
    pub label: String,
}

pub struct SvgChart {
    pub width: String,
    pub height: String,
    pub plot_left: String,
    pub plot_bottom: String,
    pub plot_right: String,
    pub series: Vec<SeriesLine>,
    pub y_ticks: Vec<AxisTick>,
    pub x_ticks: Vec<AxisTick>,
}

impl SvgChart {
    pub fn from_frame(frame: &ChartFrame) -> Self {
        let y_max = frame.y_max();
        let plot_w = WIDTH - PAD_LEFT - PAD_RIGHT;
        let plot_h = HEIGHT - 2.0 * PAD_Y;
        let bottom = HEIGHT - PAD_Y;
        let step = if frame.len() > 1 {
            plot_w / (frame.len() - 1) as f64
        } else {
            0.0
        };

        let x_at = |i: usize| PAD_LEFT + i as f64 * step;
        let y_at = |v: f64| bottom - (v.max(0.0) / y_max) * plot_h;

        let series = frame
            .series
            .iter()
            .map(|s| SeriesLine {
                name: s.name,
                color: s.color,
                points: s
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), y_at(*v)))
                    .collect::<Vec<_>>()
                    .join(" "),
            })
            .collect();

        let y_ticks = [0.0, y_max / 2.0, y_max]
            .into_iter()
            .map(|v| AxisTick {
                x: format!("{:.1}", PAD_LEFT - 6.0),
                y: format!("{:.1}", y_at(v)),
                label: format!("{v:.0}"),
            })
            .collect();

        let x_ticks = tick_indices(frame.len())
            .into_iter()
            .map(|i| AxisTick {
                x: format!("{:.1}", x_at(i)),
                y: format!("{:.1}", bottom + 16.0),
                label: frame.labels[i].clone(),
            })
            .collect();

        Self {
            width: format!("{WIDTH:.0}"),
            height: format!("{HEIGHT:.0}"),
            plot_left: format!("{PAD_LEFT:.1}"),
            plot_bottom: format!("{bottom:.1}"),
            plot_right: format!("{:.1}", WIDTH - PAD_RIGHT),
            series,
            y_ticks,
            x_ticks,
        }
    }
}

/// First, middle, and last label positions.
fn tick_indices(len: usize) -> Vec<usize> {
    match len {
        0 => Vec::new(),
        1 => vec![0],
        2 => vec![0, 1],
        n => vec![0, (n - 1) / 2, n - 1],
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    refresh_secs: u64,
    fields: &'a [MetricField],
    status_text: &'a str,
    status_class: &'a str,
    chart: Option<&'a SvgChart>,
    animate: bool,
}

// ── Sink ────────────────────────────────────────────────────────

/// Writes the dashboard page to a file on every present.
pub struct HtmlSink {
    path: PathBuf,
    refresh: Duration,
    fields: Vec<MetricField>,
    status_text: String,
    status_class: String,
    chart: Option<SvgChart>,
    animate: bool,
}

impl HtmlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            refresh: DEFAULT_INTERVAL,
            fields: vec![
                MetricField {
                    id: Field::Cpu.id(),
                    label: "CPU Usage",
                    text: "--".to_string(),
                },
                MetricField {
                    id: Field::Memory.id(),
                    label: "Memory Usage",
                    text: "--".to_string(),
                },
                MetricField {
                    id: Field::Load.id(),
                    label: "Load Average",
                    text: "--".to_string(),
                },
            ],
            status_text: StatusIndicator::Uninitialized.message().to_string(),
            status_class: StatusIndicator::Uninitialized.class().to_string(),
            chart: None,
            animate: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the current page without writing it.
    pub fn render_page(&self) -> Result<String, RenderError> {
        let page = DashboardTemplate {
            refresh_secs: self.refresh.as_secs().max(1),
            fields: &self.fields,
            status_text: &self.status_text,
            status_class: &self.status_class,
            chart: self.chart.as_ref(),
            animate: self.animate,
        };
        Ok(page.render()?)
    }
}

impl DisplaySink for HtmlSink {
    fn set_text(&mut self, field: Field, text: &str) {
        if let Some(slot) = self.fields.iter_mut().find(|f| f.id == field.id()) {
            slot.text = text.to_string();
        }
    }

    fn set_status(&mut self, text: &str, class: &str) {
        self.status_text = text.to_string();
        self.status_class = class.to_string();
    }

    fn draw_chart(&mut self, frame: &ChartFrame, mode: RedrawMode) {
        self.chart = Some(SvgChart::from_frame(frame));
        self.animate = mode == RedrawMode::Animated;
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let page = self.render_page()?;

        // Write beside the target and rename so readers never see a partial page.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, page)?;
        std::fs::rename(&tmp, &self.path)?;

        // Later presents within the same page load are plain data swaps.
        self.animate = false;
        debug!(path = %self.path.display(), "dashboard page written");
        Ok(())
    }

    fn interval_changed(&mut self, interval: Duration) {
        self.refresh = interval;
    }
}
