//! Poller — owns the poll timer and its configuration.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use pulse_core::{ConfigError, MetricsSnapshot, PollConfig, PollError};

use crate::source::MetricsSource;

/// Result of one completed fetch.
pub type PollOutcome = Result<MetricsSnapshot, PollError>;

/// The active timer task.
struct TimerSlot {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl TimerSlot {
    fn cancel(self) {
        let _ = self.shutdown_tx.send(true);
        self.handle.abort();
    }
}

/// Drives periodic fetches and forwards every outcome to a channel.
///
/// Must be used from within a tokio runtime.
pub struct Poller {
    source: Arc<dyn MetricsSource>,
    outcomes: mpsc::UnboundedSender<PollOutcome>,
    config: PollConfig,
    timer: Option<TimerSlot>,
}

impl Poller {
    pub fn new(
        source: Arc<dyn MetricsSource>,
        outcomes: mpsc::UnboundedSender<PollOutcome>,
    ) -> Self {
        Self {
            source,
            outcomes,
            config: PollConfig::default(),
            timer: None,
        }
    }

    /// Start polling: one immediate fetch, then one every interval.
    ///
    /// Any timer already running is cancelled first.
    pub fn start(&mut self, config: PollConfig) {
        self.config = config;
        self.restart();
    }

    /// Replace the interval and restart the timer.
    ///
    /// A zero interval is rejected and the current timer keeps running.
    pub fn set_interval(&mut self, interval: Duration) -> Result<(), ConfigError> {
        let config = PollConfig::new(interval)?;
        self.start(config);
        Ok(())
    }

    /// Stop polling. Fetches already in flight still report their outcome.
    pub fn stop(&mut self) {
        if let Some(slot) = self.timer.take() {
            slot.cancel();
            info!("polling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.config.interval()
    }

    fn restart(&mut self) {
        // Cancel before spawning so two timers never overlap.
        if let Some(old) = self.timer.take() {
            old.cancel();
            debug!("previous poll timer cancelled");
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let interval = self.config.interval();
        let source = self.source.clone();
        let outcomes = self.outcomes.clone();

        let handle = tokio::spawn(async move {
            run_timer(interval, source, outcomes, shutdown_rx).await;
        });

        self.timer = Some(TimerSlot {
            handle,
            shutdown_tx,
        });

        info!(
            interval_secs = interval.as_secs_f64(),
            "polling interval set to {} seconds",
            interval.as_secs_f64()
        );
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(slot) = self.timer.take() {
            slot.cancel();
        }
    }
}

/// The timer loop. The first tick completes immediately.
async fn run_timer(
    interval: Duration,
    source: Arc<dyn MetricsSource>,
    outcomes: mpsc::UnboundedSender<PollOutcome>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if outcomes.is_closed() {
                    debug!("outcome receiver dropped, poll timer exiting");
                    break;
                }
                spawn_fetch(source.clone(), outcomes.clone());
            }
            _ = shutdown.changed() => {
                debug!("poll timer shutting down");
                break;
            }
        }
    }
}

/// Fetch in its own task so a slow response never delays the next tick.
fn spawn_fetch(source: Arc<dyn MetricsSource>, outcomes: mpsc::UnboundedSender<PollOutcome>) {
    tokio::spawn(async move {
        let outcome = source.fetch().await;
        if let Err(ref e) = outcome {
            warn!(kind = e.kind(), error = %e, "failed to fetch or process metrics");
        }
        let _ = outcomes.send(outcome);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::source::BoxFuture;

    /// Counts fetches and replays a scripted sequence of outcomes.
    struct ScriptedSource {
        calls: AtomicUsize,
        script: Mutex<Vec<PollOutcome>>,
    }

    impl ScriptedSource {
        fn healthy() -> Arc<Self> {
            Self::scripted(Vec::new())
        }

        fn scripted(mut script: Vec<PollOutcome>) -> Arc<Self> {
            script.reverse();
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(script),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MetricsSource for ScriptedSource {
        fn fetch(&self) -> BoxFuture<'_, PollOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(MetricsSnapshot::new(10.0, 20.0, 0.5, false)));
            Box::pin(async move { next })
        }
    }

    /// A request that never completes.
    struct HangingSource {
        calls: AtomicUsize,
    }

    impl MetricsSource for HangingSource {
        fn fetch(&self) -> BoxFuture<'_, PollOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(std::future::pending())
        }
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[tokio::test(start_paused = true)]
    async fn start_fetches_immediately_then_every_interval() {
        let source = ScriptedSource::healthy();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(source.clone(), tx);

        poller.start(PollConfig::new(secs(1)).unwrap());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(source.calls(), 1, "first fetch is immediate");

        // Ticks at 1s, 2s, 3s.
        tokio::time::sleep(Duration::from_millis(3_400)).await;
        assert_eq!(source.calls(), 4);
        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn set_interval_leaves_exactly_one_timer() {
        let source = ScriptedSource::healthy();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(source.clone(), tx);

        poller.start(PollConfig::new(secs(1)).unwrap());
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        // 0s, 1s, 2s, 3s.
        let before = source.calls();
        assert_eq!(before, 4);

        poller.set_interval(secs(2)).unwrap();
        assert_eq!(poller.interval(), secs(2));

        // New timer fires at +0s, +2s, +4s. A surviving 1s timer would add
        // four more fetches in this window.
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        assert_eq!(source.calls() - before, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_restarts_do_not_accumulate_timers() {
        let source = ScriptedSource::healthy();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(source.clone(), tx);

        for _ in 0..5 {
            poller.start(PollConfig::new(secs(1)).unwrap());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        let before = source.calls();

        tokio::time::sleep(secs(3)).await;
        // One timer: ticks at 1s, 2s, 3s relative to start.
        assert_eq!(source.calls() - before, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_rejected_and_timer_kept() {
        let source = ScriptedSource::healthy();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(source.clone(), tx);

        poller.start(PollConfig::new(secs(1)).unwrap());
        assert!(poller.set_interval(Duration::ZERO).is_err());
        assert!(poller.is_running());
        assert_eq!(poller.interval(), secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_fetches() {
        let source = ScriptedSource::healthy();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(source.clone(), tx);

        poller.start(PollConfig::new(secs(1)).unwrap());
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        poller.stop();
        assert!(!poller.is_running());

        let after_stop = source.calls();
        tokio::time::sleep(secs(5)).await;
        assert_eq!(source.calls(), after_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_do_not_stop_the_timer() {
        let source = ScriptedSource::scripted(vec![
            Err(PollError::Transport("connection refused".into())),
            Err(PollError::ServerReported("sensor offline".into())),
            Err(PollError::MalformedResponse("missing field".into())),
        ]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(source.clone(), tx);

        poller.start(PollConfig::new(secs(1)).unwrap());
        tokio::time::sleep(Duration::from_millis(3_500)).await;

        let mut kinds = Vec::new();
        while let Ok(outcome) = rx.try_recv() {
            kinds.push(match outcome {
                Ok(_) => "ok",
                Err(e) => e.kind(),
            });
        }
        assert_eq!(
            kinds,
            vec!["transport", "server_reported", "malformed_response", "ok"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_fetch_does_not_block_ticks() {
        let source = Arc::new(HangingSource {
            calls: AtomicUsize::new(0),
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = Poller::new(source.clone(), tx);

        poller.start(PollConfig::new(secs(1)).unwrap());
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_poller_cancels_timer() {
        let source = ScriptedSource::healthy();
        let (tx, _rx) = mpsc::unbounded_channel();
        {
            let mut poller = Poller::new(source.clone(), tx);
            poller.start(PollConfig::new(secs(1)).unwrap());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        let calls = source.calls();
        tokio::time::sleep(secs(3)).await;
        assert_eq!(source.calls(), calls);
    }
}
