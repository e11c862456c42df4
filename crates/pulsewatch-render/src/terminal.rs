//! Plain-text sink for terminals and log files.

use std::io::Write;

use crate::chart::{ChartFrame, RedrawMode, sparkline};
use crate::error::RenderError;
use crate::sink::{DisplaySink, Field};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Writes one text frame per poll outcome.
///
/// ```text
/// CPU 12.30%   Memory 45.60%   Load 0.75
/// [safe] System is running smoothly.
///   CPU Usage (%)     ▁▂▂▃   12:00:00 → 12:00:15
///   Memory Usage (%)  ▄▄▄▄
///   Load Avg          ▁▁▁▁
/// ```
pub struct TerminalSink<W: Write> {
    out: W,
    fields: [String; 3],
    status: String,
    chart: Vec<String>,
    clear_screen: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fields: ["--".to_string(), "--".to_string(), "--".to_string()],
            status: String::new(),
            chart: Vec::new(),
            clear_screen: false,
        }
    }

    /// Redraw in place instead of scrolling.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn set_text(&mut self, field: Field, text: &str) {
        self.fields[field.index()] = text.to_string();
    }

    fn set_status(&mut self, text: &str, class: &str) {
        let state = class.rsplit(' ').next().unwrap_or(class);
        self.status = format!("[{state}] {text}");
    }

    // Terminals have no transitions; both modes redraw the same way.
    fn draw_chart(&mut self, frame: &ChartFrame, _mode: RedrawMode) {
        let max = frame.y_max();
        let range = match (frame.labels.first(), frame.labels.last()) {
            (Some(first), Some(last)) => format!("   {first} → {last}"),
            _ => String::new(),
        };

        self.chart = frame
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let suffix = if i == 0 { range.as_str() } else { "" };
                format!("  {:<18}{}{}", s.name, sparkline(&s.values, max), suffix)
            })
            .collect();
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        writeln!(
            self.out,
            "CPU {}   Memory {}   Load {}",
            self.fields[0], self.fields[1], self.fields[2]
        )?;
        writeln!(self.out, "{}", self.status)?;
        for line in &self.chart {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
