//! Coordinator configuration management for `livelink.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                         |
//! |------------|-------------------------------------------------|
//! | `[watch]`  | Debounce quiet window                           |
//! | `[reload]` | Hot-injectable served-path suffixes             |
//! | `[serve]`  | WebSocket port, bind-address override           |
//!
//! A missing config file is not an error; every key has a documented default.
//! CLI flags override file values.

mod error;
mod reload;
mod serve;
mod watch;

pub use error::ConfigError;
pub use reload::ReloadConfig;
pub use serve::ServeConfig;
pub use watch::WatchConfig;

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::log;

/// Root configuration structure representing livelink.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Debounce settings
    pub watch: WatchConfig,

    /// Reload classification settings
    pub reload: ReloadConfig,

    /// Transport settings
    pub serve: ServeConfig,
}

impl LiveConfig {
    /// Load configuration from CLI arguments.
    ///
    /// A missing file yields defaults; a present-but-invalid file is an error.
    /// Unknown keys are warned about but tolerated, so a config written for a
    /// newer version still loads.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(&cli.config) {
            Ok(raw) => Self::parse(&raw, &cli.config)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                crate::debug!("serve"; "no config at {}, using defaults", cli.config.display());
                Self::default()
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: cli.config.clone(),
                    source: e,
                });
            }
        };

        config.config_path = cli.config.clone();
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML, warning on unknown keys instead of failing.
    fn parse(raw: &str, path: &std::path::Path) -> Result<Self, ConfigError> {
        let de = toml::de::Deserializer::new(raw);
        let config: Self =
            serde_ignored::deserialize(de, |unknown| {
                log!("serve"; "unknown config key `{}` in {}", unknown, path.display());
            })
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(config)
    }

    /// Merge CLI overrides on top of file values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(quiet_ms) = cli.quiet_ms {
            self.watch.quiet_ms = quiet_ms;
        }
        if !cli.inject.is_empty() {
            self.reload.inject = cli.inject.clone();
        }
        if let Some(port) = cli.ws_port {
            self.serve.ws_port = port;
        }
        if cli.bind.is_some() {
            self.serve.bind = cli.bind.clone();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.quiet_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "watch.quiet_ms must be at least 1".to_string(),
            });
        }
        if self.reload.inject.is_empty() {
            return Err(ConfigError::Invalid {
                message: "reload.inject must list at least one suffix".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse config from a TOML string with defaults (test helper).
#[cfg(test)]
pub fn test_parse_config(raw: &str) -> LiveConfig {
    LiveConfig::parse(raw, std::path::Path::new("livelink.toml")).expect("test config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_defaults_when_empty() {
        let config = test_parse_config("");
        assert_eq!(config.watch.quiet_ms, 500);
        assert_eq!(config.reload.inject, vec![".css", ".jpg", ".png"]);
        assert_eq!(config.serve.ws_port, 35729);
        assert!(config.serve.bind.is_none());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = test_parse_config("[watch]\nquiet_ms = 250");
        assert_eq!(config.watch.quiet_ms, 250);
        assert_eq!(config.serve.ws_port, 35729);
    }

    #[test]
    fn test_unknown_keys_tolerated() {
        let config = test_parse_config("[watch]\nquiet_ms = 100\nfuture_knob = true");
        assert_eq!(config.watch.quiet_ms, 100);
    }

    #[test]
    fn test_cli_overrides_beat_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livelink.toml");
        std::fs::write(&path, "[watch]\nquiet_ms = 900\n[reload]\ninject = [\".css\"]").unwrap();

        let cli = Cli::parse_from([
            "livelink",
            "--config",
            path.to_str().unwrap(),
            "--quiet-ms",
            "120",
            "--inject",
            ".svg",
            "--inject",
            ".png",
        ]);
        let config = LiveConfig::load(&cli).unwrap();
        assert_eq!(config.watch.quiet_ms, 120);
        assert_eq!(config.reload.inject, vec![".svg", ".png"]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cli = Cli::parse_from(["livelink", "--config", "/nonexistent/livelink.toml"]);
        let config = LiveConfig::load(&cli).unwrap();
        assert_eq!(config.watch.quiet_ms, 500);
    }

    #[test]
    fn test_zero_quiet_window_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livelink.toml");
        std::fs::write(&path, "[watch]\nquiet_ms = 0").unwrap();

        let cli = Cli::parse_from(["livelink", "--config", path.to_str().unwrap()]);
        assert!(LiveConfig::load(&cli).is_err());
    }

    #[test]
    fn test_broken_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livelink.toml");
        std::fs::write(&path, "[watch\nquiet_ms = 10").unwrap();

        let cli = Cli::parse_from(["livelink", "--config", path.to_str().unwrap()]);
        assert!(LiveConfig::load(&cli).is_err());
    }
}
