mod action;
mod app;
mod app_state;
mod component;
mod components;
mod controller;
mod focus;
mod remote;
mod theme;
mod widgets;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sonosbox_proto::config::Config;
use sonosbox_proto::{platform, ApiClient};

/// Terminal remote for a speaker playback service.
#[derive(Parser, Debug)]
#[command(name = "sonosbox", version, about)]
struct Args {
    /// Service base URL, e.g. http://192.168.1.10:46864 (overrides the config file)
    #[arg(long)]
    server: Option<String>,

    /// Speaker address to select at startup (overrides the config file)
    #[arg(long)]
    speaker: Option<String>,

    /// Log app internals at debug level
    #[arg(long)]
    debug: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(server) = args.server {
        config.server.base_url = server;
    }
    if let Some(speaker) = args.speaker {
        config.speaker.default = Some(speaker);
    }

    let mut log_path = platform::log_path();
    if let Some(dir) = log_path.parent() {
        if std::fs::create_dir_all(dir).is_err() {
            log_path = platform::temp_dir().join("sonosbox.log");
        }
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    // RUST_LOG wins over the configured filter; --debug raises our own crates.
    let mut log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.filter.clone());
    if args.debug {
        log_filter.push_str(",sonosbox=debug,sonosbox_proto=debug");
    }
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("sonosbox log: {}", log_path.display());

    tracing::info!(
        server = %config.server.base_url,
        config = %config_path.display(),
        "sonosbox starting…"
    );

    let client = ApiClient::new(&config.server.base_url, config.server.timeout())?;

    let app = app::App::new(
        client,
        config.polling.status_interval(),
        config.speaker.default.clone(),
    );
    app.run().await?;

    Ok(())
}
