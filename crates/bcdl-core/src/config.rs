use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::format::FileType;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Timed-out attempts that are retried before a job fails.
    pub max_retries: u32,
    /// Per-attempt timeout of the first attempt, in seconds.
    pub initial_timeout_secs: u64,
    /// Added to the per-attempt timeout after every timeout, in seconds.
    pub timeout_increment_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            max_retries: p.max_retries,
            initial_timeout_secs: p.initial_timeout.as_secs(),
            timeout_increment_secs: p.timeout_increment.as_secs(),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(c: &RetryConfig) -> Self {
        RetryPolicy {
            max_retries: c.max_retries,
            initial_timeout: Duration::from_secs(c.initial_timeout_secs),
            timeout_increment: Duration::from_secs(c.timeout_increment_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/bcdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BcdlConfig {
    /// Concurrent download attempts. More than a few tends to get throttled.
    pub workers: usize,
    /// Items the collection page reveals per pagination step.
    pub page_size: usize,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Format used when none is given on the command line.
    #[serde(default)]
    pub default_format: Option<FileType>,
}

impl Default for BcdlConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            page_size: 20,
            retry: None,
            default_format: None,
        }
    }
}

impl BcdlConfig {
    /// Engine settings derived from this configuration.
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            workers: self.workers.max(1),
            retry: self
                .retry
                .as_ref()
                .map(RetryPolicy::from)
                .unwrap_or_default(),
        }
    }
}

/// Tuning knobs the orchestrator and pool run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Worker pool size per pagination step.
    pub workers: usize,
    pub retry: RetryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        BcdlConfig::default().engine()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bcdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BcdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BcdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: BcdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
