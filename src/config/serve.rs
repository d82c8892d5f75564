//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! ws_port = 35729             # WebSocket listener port
//! bind = "127.0.0.1:8090"     # bind-address override passed to the core
//! ```
//!
//! If `ws_port` is taken, the listener retries upward a few ports. `bind` is
//! forwarded to the supervised core as `--bind <addr>`; the effective address
//! is whatever the core reports back in its `Listening` record.

use serde::{Deserialize, Serialize};

/// Transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// WebSocket listener port for browser clients.
    pub ws_port: u16,

    /// Optional bind-address override for the supervised core.
    pub bind: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            ws_port: 35729,
            bind: None,
        }
    }
}
