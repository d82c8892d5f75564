//! livelink - live reload coordinator for a supervised watcher/server core.

mod actor;
mod cli;
mod config;
mod logger;
mod protocol;
mod supervisor;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};

use actor::Coordinator;
use cli::Cli;
use config::LiveConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = Arc::new(LiveConfig::load(&cli)?);

    // Ctrl+C feeds the coordinator's shutdown poll
    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .context("failed to install Ctrl+C handler")?;

    let coordinator = Coordinator::with_config(config)
        .with_core_command(cli.command.clone())
        .with_shutdown_signal(shutdown_rx);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?
        .block_on(coordinator.run())
}
