//! CLI command handlers, one file per subcommand.

mod config;
mod run;

pub use config::run_show_config;
#[cfg(test)]
pub(crate) use run::{build_template, drive};
pub use run::run_load;
