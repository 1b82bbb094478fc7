//! `volley config` – show where settings come from and their values.

use anyhow::{Context, Result};
use std::path::Path;
use volley_core::config::{self, VolleyConfig};

pub fn run_show_config(cfg: &VolleyConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg).context("render config")?);
    Ok(())
}
