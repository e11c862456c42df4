use std::path::Path;

use pulse_core::WatchConfig;

/// Write a watch.toml scaffold pointing at `endpoint`.
pub fn init(path: &Path, endpoint: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let config = WatchConfig::scaffold(endpoint);
    std::fs::write(path, config.to_toml_string()?)?;
    println!("Wrote {}", path.display());
    Ok(())
}
