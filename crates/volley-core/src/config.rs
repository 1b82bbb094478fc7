use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration loaded from `~/.config/volley/config.toml`.
///
/// Every value is a default; CLI flags override them per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolleyConfig {
    /// Total number of requests per run.
    pub requests: u64,
    /// Number of concurrent workers.
    pub concurrency: usize,
    /// How often the CLI polls and prints progress, in milliseconds.
    pub progress_interval_ms: u64,
    /// TCP/TLS connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout per request, in seconds.
    pub timeout_secs: u64,
    /// Follow 3xx redirects.
    #[serde(default = "default_true")]
    pub follow_redirects: bool,
    /// Keep response bodies in memory (only their length is needed for reports).
    #[serde(default)]
    pub capture_body: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VolleyConfig {
    fn default() -> Self {
        Self {
            requests: 100,
            concurrency: 10,
            progress_interval_ms: 100,
            connect_timeout_secs: 15,
            timeout_secs: 30,
            follow_redirects: true,
            capture_body: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("volley")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VolleyConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VolleyConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<VolleyConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: VolleyConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
