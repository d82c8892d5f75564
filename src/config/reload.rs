//! `[reload]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [reload]
//! inject = [".css", ".jpg", ".png"]   # hot-injectable served-path suffixes
//! ```
//!
//! A changed file whose served path ends in one of these suffixes can be
//! hot-swapped in the page without a full reload. Any change outside the set
//! forces a full reload of every connected client.

use serde::{Deserialize, Serialize};

/// Reload classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Served-path suffixes that are hot-injectable. Order-independent; each
    /// suffix is tested on its own.
    pub inject: Vec<String>,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            inject: vec![".css".to_string(), ".jpg".to_string(), ".png".to_string()],
        }
    }
}
