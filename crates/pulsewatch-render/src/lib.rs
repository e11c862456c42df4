//! pulsewatch-render — turns poll outcomes into a live display.
//!
//! The `Renderer` owns the rolling sample history and the status indicator
//! and writes to any `DisplaySink`. Two sinks ship with the crate:
//!
//! | Sink | Output |
//! |---|---|
//! | `TerminalSink` | text frame with per-series sparklines on any `io::Write` |
//! | `HtmlSink` | self-refreshing HTML page with an inline SVG line chart |
//!
//! `MemorySink` records everything written to it and is meant for tests
//! and embedding.

pub mod chart;
pub mod error;
pub mod history;
pub mod html;
pub mod renderer;
pub mod sink;
pub mod status;
pub mod terminal;

pub use chart::{ChartFrame, RedrawMode, Series};
pub use error::RenderError;
pub use history::{HistoryPoint, RollingHistory};
pub use html::HtmlSink;
pub use renderer::{Renderer, format_load, format_percent, time_label};
pub use sink::{DisplaySink, Field, MemorySink};
pub use status::StatusIndicator;
pub use terminal::TerminalSink;
