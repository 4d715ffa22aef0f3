use crate::fetcher::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_CONCURRENCY, FetcherConfig};
use crate::watch::DEFAULT_INTERVAL;
use serde::Deserialize;
use std::time::Duration;

/// Config file used when `CONFIG_FILE` is not set. Optional: missing means defaults.
pub const DEFAULT_CONFIG_FILE: &str = "whale.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    /// Ceiling on simultaneous in-flight stats calls.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Per-call stats deadline.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Overall deadline for one-shot (non-watch) runs.
    #[serde(default = "default_oneshot_timeout_secs")]
    pub oneshot_timeout_secs: u64,
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_millis() as u64
}

fn default_oneshot_timeout_secs() -> u64 {
    15
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            oneshot_timeout_secs: default_oneshot_timeout_secs(),
        }
    }
}

impl CollectorConfig {
    pub fn fetcher(&self) -> FetcherConfig {
        FetcherConfig {
            max_concurrency: self.max_concurrency,
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
        }
    }

    pub fn oneshot_timeout(&self) -> Duration {
        Duration::from_secs(self.oneshot_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL.as_millis() as u64
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl AppConfig {
    /// Load from `CONFIG_FILE`, else `whale.toml` if present, else defaults.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_from_path(&path),
            Err(_) if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_path(DEFAULT_CONFIG_FILE)
            }
            Err(_) => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    fn load_from_path(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.collector.max_concurrency > 0,
            "collector.max_concurrency must be > 0, got {}",
            self.collector.max_concurrency
        );
        anyhow::ensure!(
            self.collector.fetch_timeout_ms > 0,
            "collector.fetch_timeout_ms must be > 0, got {}",
            self.collector.fetch_timeout_ms
        );
        anyhow::ensure!(
            self.collector.oneshot_timeout_secs > 0,
            "collector.oneshot_timeout_secs must be > 0, got {}",
            self.collector.oneshot_timeout_secs
        );
        anyhow::ensure!(
            self.watch.interval_ms > 0,
            "watch.interval_ms must be > 0, got {}",
            self.watch.interval_ms
        );
        Ok(())
    }
}
