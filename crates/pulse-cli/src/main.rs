use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "pulse",
    about = "PulseWatch — live CPU, memory, and load dashboard for a /metrics endpoint",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the endpoint and keep the dashboard up to date.
    ///
    /// While running, type a whole number of seconds and press enter to
    /// change the poll interval.
    Watch {
        /// Path to watch.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Metrics endpoint URL (http only)
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Poll interval in seconds
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
        /// Per-request timeout in seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
        /// Number of samples kept on the chart
        #[arg(long)]
        max_points: Option<usize>,
        /// Also write a self-refreshing HTML dashboard to this file
        #[arg(long)]
        html_out: Option<PathBuf>,
        /// Do not read interval changes from stdin
        #[arg(long)]
        no_stdin: bool,
        /// Redraw the terminal in place instead of scrolling
        #[arg(long)]
        clear: bool,
    },
    /// Fetch one snapshot and print it.
    Probe {
        /// Metrics endpoint URL (http only)
        #[arg(short, long, default_value = pulse_cli::settings::DEFAULT_ENDPOINT)]
        endpoint: String,
        /// Per-request timeout in seconds
        #[arg(long, default_value = "2", value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Write a watch.toml scaffold.
    Init {
        #[arg(short, long, default_value = "watch.toml")]
        path: PathBuf,
        /// Endpoint to put in the scaffold
        #[arg(short, long, default_value = pulse_cli::settings::DEFAULT_ENDPOINT)]
        endpoint: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    match cli.command {
        Commands::Watch {
            config,
            endpoint,
            interval,
            timeout,
            max_points,
            html_out,
            no_stdin,
            clear,
        } => {
            let overrides = pulse_cli::Overrides {
                endpoint,
                interval_secs: interval,
                timeout_secs: timeout,
                max_points,
                html_out,
            };
            commands::watch::watch(config.as_deref(), overrides, !no_stdin, clear).await
        }
        Commands::Probe {
            endpoint,
            timeout,
            format,
        } => commands::probe::probe(&endpoint, timeout, &format).await,
        Commands::Init {
            path,
            endpoint,
            force,
        } => commands::init::init(&path, &endpoint, force),
    }
}
