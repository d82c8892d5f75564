//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! quiet_ms = 500   # debounce quiet window in milliseconds
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Debounce settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet window in milliseconds. A change batch closes once this much time
    /// elapses with no new events; every new event resets the window.
    pub quiet_ms: u64,
}

impl WatchConfig {
    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { quiet_ms: 500 }
    }
}
