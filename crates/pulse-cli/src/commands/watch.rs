use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, info};

use pulse_cli::{Dashboard, Overrides, Settings};
use pulse_core::WatchConfig;
use pulsewatch_poller::{Endpoint, HttpSource};
use pulsewatch_render::{DisplaySink, HtmlSink, TerminalSink};

/// Poll until Ctrl-C.
pub async fn watch(
    config_path: Option<&Path>,
    overrides: Overrides,
    read_stdin: bool,
    clear: bool,
) -> anyhow::Result<()> {
    let file = match config_path {
        Some(path) => Some(
            WatchConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
        ),
        None => None,
    };
    let settings = Settings::resolve(file, overrides)?;

    let endpoint = Endpoint::parse(&settings.endpoint)?;
    let source = HttpSource::new(endpoint).with_timeout(settings.timeout);

    let mut sinks: Vec<Box<dyn DisplaySink>> =
        vec![Box::new(TerminalSink::new(std::io::stdout()).with_clear_screen(clear))];
    if let Some(path) = &settings.html_out {
        info!(path = %path.display(), "writing HTML dashboard");
        sinks.push(Box::new(HtmlSink::new(path)));
    }

    let mut dashboard = Dashboard::new(Arc::new(source), sinks, settings.max_points)?;

    info!(
        endpoint = %settings.endpoint,
        interval_secs = settings.poll.interval().as_secs_f64(),
        max_points = settings.max_points,
        "pulse watch starting"
    );
    dashboard.start(settings.poll);

    let (control_tx, control_rx) = mpsc::unbounded_channel();
    if read_stdin {
        // A plain thread: a blocked stdin read must not hold up runtime shutdown.
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if control_tx.send(line).is_err() {
                    break;
                }
            }
            debug!("interval control closed");
        });
    } else {
        drop(control_tx);
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    dashboard.run(control_rx, shutdown).await;

    Ok(())
}
