use std::time::Duration;

use pulse_core::MetricsSnapshot;
use pulsewatch_poller::{Endpoint, HttpSource, MetricsSource};
use pulsewatch_render::{StatusIndicator, format_load, format_percent};

/// Fetch one snapshot and print it. Any poll error becomes the exit error.
pub async fn probe(endpoint: &str, timeout_secs: u64, format: &str) -> anyhow::Result<()> {
    let source = HttpSource::new(Endpoint::parse(endpoint)?)
        .with_timeout(Duration::from_secs(timeout_secs));

    let snapshot = source.fetch().await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        "text" => print!("{}", render_text(&snapshot)),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }
    Ok(())
}

fn render_text(snapshot: &MetricsSnapshot) -> String {
    let status = StatusIndicator::from_snapshot(snapshot);
    format!(
        "CPU:    {}\nMemory: {}\nLoad:   {}\nStatus: {}\n",
        format_percent(snapshot.cpu_usage),
        format_percent(snapshot.memory_usage),
        format_load(snapshot.load_avg),
        status.message()
    )
}
