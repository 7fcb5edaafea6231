//! CLI error types.

use std::fmt;

use gallery_catalog::logging::LoggingError;
use gallery_catalog::{CatalogError, ConfigError};

/// Errors surfaced by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Catalog construction or a catalog operation failed.
    Catalog(CatalogError),

    /// Configuration could not be loaded.
    Config(ConfigError),

    /// Logging could not be initialised.
    Logging(LoggingError),

    /// Failed to create the Tokio runtime.
    Runtime(String),

    /// Invalid combination of arguments.
    InvalidArgs(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Catalog(e) => write!(f, "Catalog error: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Runtime(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Catalog(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Runtime(_) => None,
            CliError::InvalidArgs(_) => None,
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
