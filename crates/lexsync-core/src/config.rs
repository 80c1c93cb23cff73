use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/lexsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Connect timeout in seconds for remote probes and fetches. Generous by
    /// default to tolerate slow links serving large model files.
    pub connect_timeout_secs: u64,
    /// Total timeout in seconds for a HEAD probe.
    pub probe_timeout_secs: u64,
    /// Total timeout in seconds for a model GET.
    pub fetch_timeout_secs: u64,
    /// Maximum concurrent fetch/decode workers within one refresh cycle.
    pub max_concurrent_fetches: usize,
    /// Worker threads backing background (`lazy`) refreshes.
    #[serde(default = "default_lazy_workers")]
    pub lazy_workers: usize,
    /// Directories searched for bundled model resources when a local path
    /// does not exist on the filesystem.
    #[serde(default)]
    pub resource_dirs: Vec<PathBuf>,
}

fn default_lazy_workers() -> usize {
    2
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 300,
            probe_timeout_secs: 330,
            fetch_timeout_secs: 3600,
            max_concurrent_fetches: 4,
            lazy_workers: default_lazy_workers(),
            resource_dirs: Vec::new(),
        }
    }
}

impl SyncConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lexsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SyncConfig = toml::from_str(&data)?;
    Ok(cfg)
}
