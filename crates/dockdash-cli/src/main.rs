//! dockdash - terminal dashboard for Docker and Podman containers

use anyhow::Context;
use clap::Parser;
use dockdash_config::GlobalConfig;
use dockdash_provider::{
    create_default_provider, create_provider, ContainerProvider, ProviderType, TimeoutProvider,
};
use dockdash_tui::{DemoProvider, RunOptions};
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "dockdash")]
#[command(author, version, about = "Terminal dashboard for Docker and Podman containers", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override default provider (docker or podman)
    #[arg(long, value_parser = ["docker", "podman"])]
    provider: Option<String>,

    /// Runtime API socket, e.g. unix:///var/run/docker.sock
    #[arg(long)]
    socket: Option<String>,

    /// Milliseconds between refreshes
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Seconds before a runtime call is abandoned
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file while the dashboard is open
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Demo mode (show TUI without container runtime)
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;

    let provider: Arc<dyn ContainerProvider> = if cli.demo {
        Arc::new(DemoProvider::new())
    } else {
        let provider = match cli.provider.as_deref() {
            Some("docker") => create_provider(ProviderType::Docker, &config).await,
            Some("podman") => create_provider(ProviderType::Podman, &config).await,
            _ => create_default_provider(&config).await,
        }?;
        Arc::new(TimeoutProvider::new(Arc::from(provider), config.call_timeout()))
    };

    let options = RunOptions {
        refresh_interval: config.refresh_interval(),
        // With a log file nothing reaches the terminal, keep logging
        suppress_logs: cli.log_file.is_none(),
    };
    dockdash_tui::run(provider, options).await?;

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let (file_layer, stderr_layer) = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            let layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

/// Config file first, then command line overrides
fn load_config(cli: &Cli) -> anyhow::Result<GlobalConfig> {
    let mut config = match &cli.config {
        Some(path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {}", e);
            GlobalConfig::default()
        }),
    };

    if let Some(provider) = &cli.provider {
        config.defaults.provider = provider.clone();
    }
    if let Some(socket) = &cli.socket {
        match config.defaults.provider.as_str() {
            "podman" => config.providers.podman.socket = socket.clone(),
            _ => config.providers.docker.socket = socket.clone(),
        }
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.refresh.interval_ms = interval_ms;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.refresh.timeout_secs = timeout_secs;
    }
    config.validate()?;

    tracing::debug!(
        "Refreshing every {:?}, runtime calls time out after {:?}",
        config.refresh_interval(),
        config.call_timeout()
    );
    Ok(config)
}
