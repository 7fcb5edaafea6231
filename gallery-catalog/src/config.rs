//! Catalog configuration.
//!
//! `CatalogConfig` holds the settings applied uniformly to every position:
//! the rendering size, the transform requested from the loader, and the
//! memory budget of the image retainer. Values can be set in code or read
//! from the `[catalog]` section of an INI file:
//!
//! ```ini
//! [catalog]
//! target_size = 128
//! transform = circle
//! memory_budget_mb = 32
//! ```
//!
//! Keys that are missing fall back to the defaults. A `memory_budget_mb` of
//! zero disables retention.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::loader::Transform;

/// Default rendering size in pixels.
pub const DEFAULT_TARGET_SIZE: u32 = 256;

/// Default retainer budget (64 MiB).
pub const DEFAULT_MEMORY_BUDGET_BYTES: u64 = 64 * 1024 * 1024;

const SECTION: &str = "catalog";
const BYTES_PER_MB: u64 = 1024 * 1024;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A key holds a value that cannot be used.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Settings shared by every position of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Edge length in pixels of every requested image.
    pub target_size: u32,

    /// Transform requested for every image.
    pub transform: Transform,

    /// Retainer budget in bytes, `None` to disable retention.
    pub memory_budget_bytes: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            transform: Transform::default(),
            memory_budget_bytes: Some(DEFAULT_MEMORY_BUDGET_BYTES),
        }
    }
}

impl CatalogConfig {
    /// Set the rendering size.
    pub fn with_target_size(mut self, target_size: u32) -> Self {
        self.target_size = target_size;
        self
    }

    /// Set the transform requested from the loader.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the retainer budget in bytes.
    pub fn with_memory_budget(mut self, bytes: u64) -> Self {
        self.memory_budget_bytes = Some(bytes);
        self
    }

    /// Keep no strong references; images live only as long as external holders.
    pub fn without_retention(mut self) -> Self {
        self.memory_budget_bytes = None;
        self
    }

    /// Load configuration from an INI file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or if a
    /// value is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(e) => ConfigError::Parse(e.to_string()),
        })?;
        Self::from_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let Some(section) = ini.section(Some(SECTION)) else {
            return Ok(config);
        };

        if let Some(value) = section.get("target_size") {
            let size = parse_number::<u32>("target_size", value)?;
            if size == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "target_size".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.target_size = size;
        }

        if let Some(value) = section.get("transform") {
            config.transform = value.parse().map_err(|e: crate::loader::UnknownTransform| {
                ConfigError::InvalidValue {
                    key: "transform".to_string(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = section.get("memory_budget_mb") {
            let mb = parse_number::<u64>("memory_budget_mb", value)?;
            let bytes = mb
                .checked_mul(BYTES_PER_MB)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "memory_budget_mb".to_string(),
                    reason: format!("{} MB does not fit in a byte count", mb),
                })?;
            config.memory_budget_bytes = (bytes > 0).then_some(bytes);
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("'{}': {}", value, e),
        })
}
