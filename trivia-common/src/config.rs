//! Configuration loading and resolution
//!
//! Each setting resolves through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Per-mode TOML config file (`development.toml` / `production.toml`)
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the database file location
pub const DATABASE_ENV_VAR: &str = "TRIVIA_DATABASE";

/// Environment variable overriding the season file directory
pub const DATA_DIR_ENV_VAR: &str = "TRIVIA_DATA_DIR";

/// Running mode, selecting which per-mode config file is consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    /// Config file name for this mode under the user config directory
    pub fn config_file_name(self) -> &'static str {
        match self {
            Mode::Development => "development.toml",
            Mode::Production => "production.toml",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional overrides read from the per-mode TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

/// Fully-resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub database_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from CLI overrides, environment, TOML, and defaults
    pub fn resolve(mode: Mode, cli_database: Option<&Path>, cli_data_dir: Option<&Path>) -> Settings {
        let toml_config = match load_config_file(mode) {
            Ok(config) => config,
            Err(e) => {
                debug!("No usable config file for {} mode: {}", mode, e);
                TomlConfig::default()
            }
        };

        let database_path = cli_database
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(DATABASE_ENV_VAR).map(PathBuf::from))
            .or_else(|| toml_config.database_path.clone())
            .unwrap_or_else(|| default_database_path(mode));

        let data_dir = cli_data_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(DATA_DIR_ENV_VAR).map(PathBuf::from))
            .or_else(|| toml_config.data_dir.clone())
            .unwrap_or_else(default_data_dir);

        Settings {
            mode,
            database_path,
            data_dir,
        }
    }
}

/// Path of the per-mode config file under the user config directory
pub fn config_file_path(mode: Mode) -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("trivia").join(mode.config_file_name()))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Read and parse the per-mode TOML config file
pub fn load_config_file(mode: Mode) -> Result<TomlConfig> {
    let path = config_file_path(mode)?;
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Per-mode default database location under the platform data directory
fn default_database_path(mode: Mode) -> PathBuf {
    let file_name = format!("trivia-{}.db", mode.as_str());
    dirs::data_local_dir()
        .map(|d| d.join("trivia").join(&file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

/// Default season file directory, relative to the working directory
fn default_data_dir() -> PathBuf {
    PathBuf::from("trivia_dataset").join("seasons")
}
