//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// livelink live-reload coordinator CLI
///
/// Supervises a native watcher/server core, debounces its change
/// notifications, and pushes reload decisions to connected browsers.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: livelink.toml)
    #[arg(short = 'C', long, default_value = "livelink.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Debounce quiet window in milliseconds (overrides [watch] quiet_ms)
    #[arg(long, value_name = "MS")]
    pub quiet_ms: Option<u64>,

    /// Hot-injectable served-path suffix; repeatable (overrides [reload] inject)
    #[arg(long, value_name = "SUFFIX")]
    pub inject: Vec<String>,

    /// WebSocket listener port (overrides [serve] ws_port)
    #[arg(long, value_name = "PORT")]
    pub ws_port: Option<u16>,

    /// Bind-address override forwarded to the core as `--bind <ADDR>`
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Native core command to supervise, e.g. `livelink -- watchserve ./public`
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}
