//! Configuration for the `ledgerkv` CLI.
//!
//! Resolution order, highest precedence first: explicit CLI flags (applied
//! by the caller after [`LedgerkvConfig::load`] returns), `LEDGERKV_*`
//! environment variables, an optional `ledgerkv.toml` in the current
//! directory, then the built-in defaults below.

mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// Top-level configuration for the CLI binary.
///
/// Every field has a `#[serde(default)]` so a partial `ledgerkv.toml` (or
/// none at all) is always valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerkvConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the log file lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("ledgerkv.db")
}

/// How verbosely the CLI logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LedgerkvConfig {
    /// Loads configuration from `ledgerkv.toml` in the current directory
    /// (if present), then applies `LEDGERKV_DATA_PATH` and
    /// `LEDGERKV_LOG_LEVEL` environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_dir(&std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Same as [`Self::load`], but looks for `ledgerkv.toml` under `dir`
    /// rather than the process's current directory. Exposed separately so
    /// tests don't need to fiddle with the process-wide working directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&dir.join("ledgerkv.toml"))?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            })?;

        toml::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("LEDGERKV_DATA_PATH") {
            self.storage.data_path = PathBuf::from(path);
        }
        if let Ok(level) = std::env::var("LEDGERKV_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}
