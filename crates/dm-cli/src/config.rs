//! Configuration file (`docmig.yml`) and settings resolution

use anyhow::{Context, Result};
use dm_mongo::{DEFAULT_CONNECTION_STRING, DEFAULT_MIGRATIONS_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "docmig.yml";

/// Contents of `docmig.yml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// MongoDB connection string
    #[serde(default)]
    pub connection_string: Option<String>,

    /// Target database name
    #[serde(default)]
    pub database: Option<String>,

    /// Directory containing migration scripts, relative to the config file
    #[serde(default)]
    pub migrations_dir: Option<PathBuf>,
}

impl Config {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let (Some(dir), Some(parent)) = (&config.migrations_dir, path.parent()) {
            if dir.is_relative() {
                config.migrations_dir = Some(parent.join(dir));
            }
        }
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), else `docmig.yml` in `cwd` if
    /// present, else an empty config.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = cwd.join(CONFIG_FILE_NAME);
        if default_path.is_file() {
            log::debug!("Using config file {}", default_path.display());
            return Self::load(&default_path);
        }
        Ok(Self::default())
    }
}

/// Effective settings after merging CLI flags, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub connection_string: String,
    /// `None` defers to the connection string's default database
    pub database: Option<String>,
    pub migrations_dir: PathBuf,
}

impl Settings {
    /// Merge flags over `config` over built-in defaults.
    pub fn merge(global: &GlobalArgs, config: Config) -> Self {
        Self {
            connection_string: global
                .connection_string
                .clone()
                .or(config.connection_string)
                .unwrap_or_else(|| DEFAULT_CONNECTION_STRING.to_string()),
            database: global.database.clone().or(config.database),
            migrations_dir: global
                .migrations_dir
                .clone()
                .or(config.migrations_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MIGRATIONS_DIR)),
        }
    }

    /// Resolve settings for the current process.
    pub fn resolve(global: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        let config = Config::discover(global.config.as_deref(), &cwd)?;
        Ok(Self::merge(global, config))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
