//! pulse-core — shared types for PulseWatch.
//!
//! Holds the metrics snapshot model and its JSON decoding, the poll error
//! kinds, duration parsing, and the `watch.toml` configuration parser.

pub mod config;
pub mod duration;
pub mod error;
pub mod types;

pub use config::WatchConfig;
pub use duration::{parse_duration, parse_interval_secs};
pub use error::{ConfigError, PollError};
pub use types::*;
