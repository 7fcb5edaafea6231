//! CLI subcommands.

pub mod config;
pub mod simulate;

use std::path::Path;

use gallery_catalog::CatalogConfig;

use crate::error::CliError;

/// Load the catalog configuration from `path`, or use defaults.
pub fn load_config(path: Option<&Path>) -> Result<CatalogConfig, CliError> {
    match path {
        Some(path) => Ok(CatalogConfig::load(path)?),
        None => Ok(CatalogConfig::default()),
    }
}

/// Format a byte count for display.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
