//! Library half of the `pulse` binary: settings resolution and the
//! dispatch loop that connects the poller to the renderer.

pub mod dashboard;
pub mod settings;

pub use dashboard::Dashboard;
pub use settings::{Overrides, Settings};
