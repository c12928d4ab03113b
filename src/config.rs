//! Configuration file handling for digicam-remote.
//!
//! Loads configuration from `<config dir>/digicam-remote/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::{SessionOptions, DEFAULT_INSTALL_DIR};
use crate::startup::{
    StartupStrategy, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, DEFAULT_WARMUP,
};

/// Template written by `digicam config init`.
pub const DEFAULT_CONFIG: &str = r#"# digicam-remote configuration

[install]
# digiCamControl installation directory
dir = 'C:\Program Files (x86)\digiCamControl'

[output]
# Report successful operations (errors are always reported)
verbose = true

[startup]
# How to wait after launching digiCamControl: "delay" or "poll"
strategy = "delay"
# Fixed warm-up for the "delay" strategy
warmup_secs = 10
# Readiness probes for the "poll" strategy
poll_attempts = 10
poll_interval_ms = 500
"#;

/// Configuration file structure for digicam-remote.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub startup: StartupConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct InstallConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { verbose: true }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Delay,
    Poll,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct StartupConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: u64,
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            warmup_secs: default_warmup_secs(),
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl StartupConfig {
    pub fn strategy(&self) -> StartupStrategy {
        match self.strategy {
            StrategyKind::Delay => {
                StartupStrategy::FixedDelay(Duration::from_secs(self.warmup_secs))
            }
            StrategyKind::Poll => StartupStrategy::Poll {
                attempts: self.poll_attempts,
                interval: Duration::from_millis(self.poll_interval_ms),
            },
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_warmup_secs() -> u64 {
    DEFAULT_WARMUP.as_secs()
}

fn default_poll_attempts() -> u32 {
    DEFAULT_POLL_ATTEMPTS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Config {
    /// Read the config file at `path`, or at [`default_path`] when none is given.
    ///
    /// A missing file means every section takes its default, so a fresh machine
    /// needs no config to reach `C:\Program Files (x86)\digiCamControl`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Session options described by this configuration.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            install_dir: self
                .install
                .dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_DIR)),
            verbose: self.output.verbose,
            startup: self.startup.strategy(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("digicam-remote").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".").join("digicam-remote.toml"))
}
