//! pulsewatch-poller — fetches metrics snapshots on a fixed interval.
//!
//! # Architecture
//!
//! ```text
//! Poller
//!   ├── timer task (tokio interval, first tick immediate)
//!   │   └── per tick: spawn fetch task → MetricsSource::fetch()
//!   └── outcomes ──mpsc──▶ dispatch loop ──▶ Renderer
//! ```
//!
//! Fetch tasks are independent of each other and of the timer. A slow
//! response never delays the next tick, and a failed one never stops it.
//! There is no retry: the next tick is the retry.
//!
//! Replacing the interval aborts the current timer task before the new
//! one is spawned, so at most one timer drives fetches at any time.
//! Fetches already in flight still report their outcome.

pub mod poller;
pub mod source;

pub use poller::{PollOutcome, Poller};
pub use source::{BoxFuture, Endpoint, HttpSource, MetricsSource};
