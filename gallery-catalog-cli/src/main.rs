//! Gallery Catalog CLI - Command-line interface
//!
//! Drives the gallery catalog library with a simulated loader so the load
//! protocol, placeholder fallback and pause/resume behaviour can be observed
//! without a UI.

mod commands;
mod error;
mod simulated;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gallery_catalog::logging::{init_logging, LoggingConfig};

use commands::config::ConfigArgs;
use commands::simulate::SimulateArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "gallery-catalog", version, about = "Lazy image catalog for scrollable galleries")]
struct Cli {
    /// Enable debug logging for the catalog
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Also write logs to a file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scroll a simulated gallery and report catalog activity
    Simulate(SimulateArgs),
    /// Show the effective catalog configuration
    Config(ConfigArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "info,gallery_catalog=debug"
    } else {
        "warn"
    };
    let mut logging = LoggingConfig::default().with_directive(directive);
    if let Some(dir) = cli.log_dir {
        logging = logging.with_log_dir(dir);
    }
    // Flushes the file writer on drop
    let _guard = init_logging(&logging)?;

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
