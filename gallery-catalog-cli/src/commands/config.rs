//! Show the effective catalog configuration.

use std::path::PathBuf;

use clap::Args;

use super::{format_size, load_config};
use crate::error::CliError;

/// Arguments for the `config` command.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// INI file with a [catalog] section
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Print the configuration that `simulate` would use.
pub fn run(args: ConfigArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    match &args.config {
        Some(path) => println!("Configuration from {}", path.display()),
        None => println!("Default configuration"),
    }
    println!("  target_size:   {} px", config.target_size);
    println!("  transform:     {}", config.transform);
    match config.memory_budget_bytes {
        Some(bytes) => println!("  memory_budget: {}", format_size(bytes)),
        None => println!("  memory_budget: disabled"),
    }
    Ok(())
}
