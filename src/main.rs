//! # ClassWatch
//!
//! Watches class and course seat availability and pings the watcher on
//! Discord the moment a spot opens. The command front end lives with
//! the bot gateway; this binary runs the store + polling scheduler.
//!
//! Usage:
//!   classwatch                 # Run the background checker
//!   classwatch --once          # One check pass, then exit
//!   classwatch --interval 1    # Custom check interval (minutes)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use classwatch_channels::DiscordChannel;
use classwatch_core::WatchConfig;
use classwatch_providers::SeatLookup;
use classwatch_scheduler::WatchScheduler;
use classwatch_store::RequestStore;

#[derive(Parser)]
#[command(
    name = "classwatch",
    version,
    about = "🎓 ClassWatch — get pinged when a class opens up"
)]
struct Cli {
    /// Config file (default: ~/.classwatch/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the request store path
    #[arg(long)]
    store: Option<PathBuf>,

    /// Override the check interval (minutes)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Run a single check pass and exit
    #[arg(long)]
    once: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => WatchConfig::load_from(path)?,
        None => WatchConfig::load()?,
    };
    if let Some(store_path) = cli.store {
        config.store_path = store_path;
    }
    if let Some(interval) = cli.interval {
        config.check_interval_minutes = interval;
    }
    if config.discord_token.is_empty() {
        tracing::warn!("⚠️ No Discord token configured — notifications will fail to send");
    }

    let store = Arc::new(RequestStore::new(
        &config.store_path,
        config.max_requests_per_user,
    ));
    let provider = Arc::new(SeatLookup::from_config(&config));
    let sink = Arc::new(DiscordChannel::new(&config.discord_token));
    let policy = WatchScheduler::policy_from_config(&config);
    let scheduler = Arc::new(WatchScheduler::new(store, provider, sink, policy, &config));

    if cli.once {
        let summary = scheduler.run_tick().await;
        tracing::info!(
            "Single pass done: {} checked, {} notified, {} failed",
            summary.checked,
            summary.notified,
            summary.failed
        );
        return Ok(());
    }

    scheduler.set_on_tick(|summary| {
        tracing::debug!("Tick processed {} request(s)", summary.checked);
    });
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    scheduler.stop();
    Ok(())
}
