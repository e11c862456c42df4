//! Dispatch loop.
//!
//! Everything here runs on one task: poll outcomes, interval-control lines,
//! and the shutdown signal are multiplexed with `select!`, so the renderer
//! is only ever touched from this loop.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use pulse_core::{ConfigError, PollConfig, parse_interval_secs};
use pulsewatch_poller::{MetricsSource, PollOutcome, Poller};
use pulsewatch_render::{DisplaySink, Renderer};

pub struct Dashboard<S: DisplaySink> {
    poller: Poller,
    renderer: Renderer<S>,
    outcomes: mpsc::UnboundedReceiver<PollOutcome>,
}

impl<S: DisplaySink> Dashboard<S> {
    pub fn new(
        source: Arc<dyn MetricsSource>,
        sink: S,
        max_points: usize,
    ) -> Result<Self, ConfigError> {
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            poller: Poller::new(source, tx),
            renderer: Renderer::new(sink, max_points)?,
            outcomes: rx,
        })
    }

    /// Begin polling. Must be called inside a tokio runtime.
    pub fn start(&mut self, config: PollConfig) {
        self.poller.start(config);
        self.renderer.on_interval_changed(config.interval());
    }

    /// Apply one line from the interval control.
    ///
    /// Anything that is not a positive whole number of seconds is logged
    /// and ignored; polling continues at the previous interval.
    pub fn handle_control(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let interval = match parse_interval_secs(line) {
            Ok(interval) => interval,
            Err(e) => {
                warn!(input = %line.trim(), error = %e, "invalid interval selected");
                return;
            }
        };
        match self.poller.set_interval(interval) {
            Ok(()) => self.renderer.on_interval_changed(interval),
            Err(e) => warn!(error = %e, "interval change rejected"),
        }
    }

    /// Fold one outcome into the display. Render failures are logged only.
    pub fn handle_outcome(&mut self, outcome: PollOutcome) {
        if let Err(e) = self.renderer.apply(&outcome) {
            warn!(error = %e, "failed to present dashboard frame");
        }
    }

    /// Wait for the next outcome and render it.
    pub async fn step(&mut self) -> bool {
        match self.outcomes.recv().await {
            Some(outcome) => {
                self.handle_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Run until `shutdown` resolves, then stop the poller.
    pub async fn run<F>(
        &mut self,
        mut control: mpsc::UnboundedReceiver<String>,
        shutdown: F,
    ) where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut control_open = true;

        loop {
            tokio::select! {
                Some(outcome) = self.outcomes.recv() => self.handle_outcome(outcome),
                line = control.recv(), if control_open => match line {
                    Some(line) => self.handle_control(&line),
                    None => control_open = false,
                },
                _ = &mut shutdown => break,
            }
        }

        self.poller.stop();
        info!("dashboard stopped");
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }
}
