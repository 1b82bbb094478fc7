//! Tracing subscriber setup.
//!
//! Events are appended to `$XDG_STATE_HOME/volley/volley.log`. The binary
//! installs a stderr subscriber instead when that file can't be opened.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,volley_core=debug";

/// Location of the log file, creating its parent directory.
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("volley").context("locate xdg dirs")?;
    dirs.place_state_file("volley.log").context("create state dir")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn install(writer: BoxMakeWriter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("install subscriber: {}", e))
}

/// Appends events to `path`. Fails if the file can't be opened or a global
/// subscriber is already set.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    install(BoxMakeWriter::new(Mutex::new(file)))?;
    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

/// File logging at the default location; returns the path in use.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    init_file_logging(&path)?;
    Ok(path)
}

/// Stderr-only logging. A no-op if a subscriber is already installed.
pub fn init_logging_stderr() {
    let _ = install(BoxMakeWriter::new(std::io::stderr));
}
