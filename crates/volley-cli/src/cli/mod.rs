//! CLI for the Volley load generator.

mod commands;
mod render;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use volley_core::config::{self, VolleyConfig};
use volley_core::Method;

use commands::{run_load, run_show_config};

/// Top-level CLI for the Volley load generator.
#[derive(Debug, Parser)]
#[command(name = "volley")]
#[command(about = "Volley: fire N copies of one HTTP request across C workers", long_about = None)]
pub struct Cli {
    /// Read settings from this file instead of ~/.config/volley/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send the same request N times with C concurrent workers.
    Run(RunArgs),

    /// Show the config file location and effective settings.
    Config,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Target URL (http or https).
    pub url: String,

    /// Total number of requests (default from config).
    #[arg(short = 'n', long, value_name = "N")]
    pub requests: Option<u64>,

    /// Number of concurrent workers (default from config).
    #[arg(short = 'c', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// HTTP method.
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// Extra request header, e.g. -H "Authorization: Bearer x". Repeatable.
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// Request body sent with every request.
    #[arg(short = 'd', long = "data", value_name = "BODY")]
    pub data: Option<String>,

    /// Progress refresh interval in milliseconds (default from config).
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Print the final summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Do not print live progress.
    #[arg(short, long)]
    pub quiet: bool,
}

fn load_config(path: Option<&std::path::Path>) -> Result<VolleyConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run(args) => run_load(&cfg, args).await?,
            CliCommand::Config => run_show_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
